//! The turn loop around the search core

use tracing::debug;

use crate::{
    agent::Player,
    board::{Board, Cell},
    config::GameConfig,
    moves::Move,
    state::GameState,
    KonaneError, Result, Role,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    /// The given role made the last move, its opponent is stuck
    Won(Role),
}

/// Whether `side` is out of capturing jumps, which ends the game in the jump phase
pub fn is_end_of_game(board: &Board, side: Cell) -> bool {
    !board.has_jump(side)
}

/// A game in progress, holding the authoritative board
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    config: GameConfig,
    to_move: Role,
    round: usize,
    status: GameStatus,
    history: Vec<Move>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.width, config.height)?,
            config,
            to_move: config.first,
            round: 1,
            status: GameStatus::Playing,
            history: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn to_move(&self) -> Role {
        self.to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Moves played so far, oldest first
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The colour of a role, the opener plays `PlayerA`
    pub fn color_of(&self, role: Role) -> Cell {
        if role == self.config.first {
            Cell::PlayerA
        } else {
            Cell::PlayerB
        }
    }

    /// A search view of the current position
    pub fn state(&self) -> GameState {
        GameState::new(
            &self.board,
            self.history.last().copied(),
            self.to_move,
            self.color_of(self.to_move),
            self.round,
        )
    }

    /// Applies a move, trusting it to be legal
    ///
    /// Opening moves clear their cell, jumps go through [`Board::apply_jump`].
    /// Once the jump phase is reached the side to move next is checked for
    /// remaining jumps and the game ends if it has none.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus> {
        if let GameStatus::Won(_) = self.status {
            return Err(KonaneError::InvalidOperation(
                "the game is already over".to_string(),
            ));
        }
        mv.apply(&mut self.board)?;
        self.history.push(mv);

        let mover = self.to_move;
        self.to_move = mover.opponent();
        self.round += 1;

        if self.round >= 3 && is_end_of_game(&self.board, self.color_of(self.to_move)) {
            self.status = GameStatus::Won(mover);
        }
        debug!(round = self.round, status = ?self.status, "played {}", mv);
        Ok(self.status)
    }

    /// Applies a move after checking it is one of the legal moves
    pub fn play_checked(&mut self, mv: Move) -> Result<GameStatus> {
        if !self.state().legal_moves().contains(&mv) {
            return Err(KonaneError::InvalidOperation(format!(
                "{} is not a legal move in round {}",
                mv, self.round
            )));
        }
        self.play(mv)
    }

    /// Asks the players for moves until one side is stuck, returning the winner
    ///
    /// A player that cannot produce a move loses on the spot.
    pub fn play_out(&mut self, max: &mut dyn Player, min: &mut dyn Player) -> Result<Role> {
        loop {
            if let GameStatus::Won(winner) = self.status {
                return Ok(winner);
            }
            let state = self.state();
            let choice = match self.to_move {
                Role::Max => max.choose(&state),
                Role::Min => min.choose(&state),
            };
            match choice {
                Some(mv) => {
                    self.play(mv)?;
                }
                None => {
                    self.status = GameStatus::Won(self.to_move.opponent());
                }
            }
        }
    }
}
