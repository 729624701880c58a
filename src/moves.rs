//! Move representation and legal move enumeration

use std::fmt;

use crate::board::{Board, Cell, Coord, DIRECTIONS};
use crate::Result;

/// A single move of either the opening or the main phase of the game
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Move {
    /// Removal of one piece in rounds 1 and 2
    Remove(Coord),
    /// A capturing jump along a row or column, possibly over several pieces
    Jump { from: Coord, to: Coord },
}

impl Move {
    /// Applies the move to a board
    pub fn apply(&self, board: &mut Board) -> Result<()> {
        match *self {
            Move::Remove(at) => board.remove(at),
            Move::Jump { from, to } => board.apply_jump(from, to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Remove(at) => write!(f, "remove ({})", at),
            Move::Jump { from, to } => write!(f, "({}) -> ({})", from, to),
        }
    }
}

/// The four cells the first player may open the game with: both corners on
/// the main diagonal and the two cells of the middle 2x2 block holding the
/// same colour as those corners
pub fn opening_removals(board: &Board) -> [Move; 4] {
    let (w, h) = (board.width(), board.height());
    let (cx, cy) = (w / 2, h / 2);
    let centre = if (cx + cy) % 2 == 0 {
        [Coord::new(cx, cy), Coord::new(cx + 1, cy + 1)]
    } else {
        [Coord::new(cx + 1, cy), Coord::new(cx, cy + 1)]
    };
    [
        Move::Remove(Coord::new(1, 1)),
        Move::Remove(centre[0]),
        Move::Remove(centre[1]),
        Move::Remove(Coord::new(w, h)),
    ]
}

/// Second round removals: one candidate per empty neighbour of each of the
/// side's pieces
///
/// A piece next to two empty cells is listed twice, the duplicates are kept.
pub fn second_removals(board: &Board, side: Cell) -> Vec<Move> {
    let mut moves = Vec::new();
    for piece in board.pieces(side) {
        let (x, y) = (piece.x as i32, piece.y as i32);
        for &(dx, dy) in DIRECTIONS.iter() {
            if board.at(x + dx, y + dy) == Some(Cell::Empty) {
                moves.push(Move::Remove(piece));
            }
        }
    }
    moves
}

/// Calls `f` with the origin and landing cell of every capturing jump `side`
/// can make, including each further landing of a multi-hop chain
fn for_each_jump<F: FnMut(Coord, Coord)>(board: &Board, side: Cell, mut f: F) {
    let other = side.opponent();
    for piece in board.pieces(side) {
        for &(dx, dy) in DIRECTIONS.iter() {
            let (mut x, mut y) = (piece.x as i32, piece.y as i32);
            // the origin is vacated by the time the piece lands again, but a
            // straight walk never looks back at it
            while board.at(x + dx, y + dy) == Some(other)
                && board.at(x + 2 * dx, y + 2 * dy) == Some(Cell::Empty)
            {
                x += 2 * dx;
                y += 2 * dy;
                f(piece, Coord::new(x as usize, y as usize));
            }
        }
    }
}

/// Every capturing jump available to `side`
pub fn jumps(board: &Board, side: Cell) -> Vec<Move> {
    let mut moves = Vec::new();
    for_each_jump(board, side, |from, to| moves.push(Move::Jump { from, to }));
    moves
}

/// The number of capturing jumps available to `side`, counting every landing
/// of a multi-hop chain separately
pub fn mobility(board: &Board, side: Cell) -> usize {
    let mut count = 0;
    for_each_jump(board, side, |_, _| count += 1);
    count
}

/// Every legal move for `side` in the given round
pub fn legal_moves(board: &Board, side: Cell, round: usize) -> Vec<Move> {
    match round {
        0 | 1 => opening_removals(board).to_vec(),
        2 => second_removals(board, side),
        _ => jumps(board, side),
    }
}
