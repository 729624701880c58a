//! Search tree nodes

use std::sync::OnceLock;

use crate::board::{Board, Cell};
use crate::eval::evaluate;
use crate::moves::{legal_moves, Move};
use crate::{Result, Role, Score};

/// A snapshot of the game as seen by the search
///
/// A state owns its board outright, successors are built by copying the
/// parent's board before changing it so no two states ever share cells.
/// Apart from the evaluation, which is filled in on first use, a state never
/// changes once built.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    // the move that led here, `None` for the root of a search
    mv: Option<Move>,
    player: Role,
    color: Cell,
    round: usize,
    evaluation: OnceLock<Score>,
}

impl GameState {
    /// Creates the root of a search over a copy of `board`
    ///
    /// `player` is the role of the side to move, which plays the pieces
    /// standing for its turn in `round`: the first player owns `PlayerA`
    /// and moves in the odd rounds.
    pub fn root(board: &Board, player: Role, round: usize) -> Self {
        let color = if round % 2 == 1 {
            Cell::PlayerA
        } else {
            Cell::PlayerB
        };
        Self::new(board, None, player, color, round)
    }

    pub fn new(board: &Board, mv: Option<Move>, player: Role, color: Cell, round: usize) -> Self {
        Self {
            board: board.clone(),
            mv,
            player,
            color,
            round,
            evaluation: OnceLock::new(),
        }
    }

    /// Supplies the evaluation up front instead of computing it on demand
    pub fn with_evaluation(self, value: Score) -> Self {
        Self {
            evaluation: OnceLock::from(value),
            ..self
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The move that produced this state
    pub fn inbound_move(&self) -> Option<Move> {
        self.mv
    }

    /// The role of the side to move
    pub fn player(&self) -> Role {
        self.player
    }

    /// The piece colour of the side to move
    pub fn color(&self) -> Cell {
        self.color
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn is_maximizing(&self) -> bool {
        self.player == Role::Max
    }

    /// Evaluation of the position from the maximizing side's point of view
    ///
    /// The score is taken for the side whose move produced this state, the
    /// one not to move now, then flipped if that side is the minimizer.
    pub fn evaluation(&self) -> Score {
        *self.evaluation.get_or_init(|| {
            let acting = evaluate(&self.board, self.color.opponent());
            match self.player.opponent() {
                Role::Max => acting,
                Role::Min => -acting,
            }
        })
    }

    /// Whether the evaluation has been supplied or already computed
    pub fn is_evaluated(&self) -> bool {
        self.evaluation.get().is_some()
    }

    /// The moves available to the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board, self.color, self.round)
    }

    /// Every state reachable in one move, in move generation order
    ///
    /// In the jump phase an empty list means the side to move has lost.
    pub fn successors(&self) -> Vec<GameState> {
        self.legal_moves()
            .into_iter()
            .filter_map(|mv| self.child(mv).ok())
            .collect()
    }

    /// The state after the side to move plays `mv`
    ///
    /// Fails without building a state if the move does not fit the board.
    pub fn child(&self, mv: Move) -> Result<GameState> {
        let mut board = self.board.clone();
        mv.apply(&mut board)?;
        Ok(Self {
            board,
            mv: Some(mv),
            player: self.player.opponent(),
            color: self.color.opponent(),
            round: self.round + 1,
            evaluation: OnceLock::new(),
        })
    }
}
