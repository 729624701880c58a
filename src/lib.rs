//! A game tree search agent for the board game 'Konane'
//!
//! The agent explores the game tree with a depth limited minimax search,
//! either exhaustively or with alpha-beta pruning, scoring the leaves by
//! how many capturing jumps each side has left.
//!
//! # Basic Usage
//!
//! ```
//! use konane_ai::{board::Board, solver::Solver, state::GameState, Role};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::new(6, 6)?;
//! let state = GameState::root(&board, Role::Max, 1);
//!
//! let result = Solver::alpha_beta(2).search(&state);
//! assert!(result.best_move.is_some());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod moves;

pub mod state;

pub mod eval;

pub mod solver;

pub mod agent;

pub mod config;

pub mod game;

mod test;

pub use error::{KonaneError, Result};

/// The default width of the game board in cells
pub const DEFAULT_WIDTH: usize = 6;

/// The default height of the game board in cells
pub const DEFAULT_HEIGHT: usize = 6;

/// The default number of plies the search looks ahead
pub const DEFAULT_DEPTH: usize = 3;

/// The smallest board side the opening rules make sense on
pub const MIN_SIDE: usize = 4;

/// The largest board side accepted by the configuration
pub const MAX_SIDE: usize = 16;

// the checkerboard opening needs even sides so that both corners hold the same colour
const_assert!(DEFAULT_WIDTH % 2 == 0 && DEFAULT_HEIGHT % 2 == 0);
const_assert!(DEFAULT_WIDTH >= MIN_SIDE && DEFAULT_WIDTH <= MAX_SIDE);
const_assert!(DEFAULT_HEIGHT >= MIN_SIDE && DEFAULT_HEIGHT <= MAX_SIDE);
const_assert!(DEFAULT_DEPTH > 0);

/// Whether a side is maximizing or minimizing the search score
///
/// The computer always searches as [`Role::Max`], its opponent is [`Role::Min`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Role {
    Max,
    Min,
}

impl Role {
    pub fn opponent(self) -> Self {
        match self {
            Role::Max => Role::Min,
            Role::Min => Role::Max,
        }
    }
}

/// Search score, always from the maximizing side's point of view
pub type Score = f64;
