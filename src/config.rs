//! Settings for a game and for the search

use crate::{
    board::Board, solver::Algorithm, KonaneError, Result, Role, DEFAULT_DEPTH, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Which role opens the game, the opener plays `PlayerA`
    pub first: Role,
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        Board::check_size(self.width, self.height)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            first: Role::Max,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// Plies searched below the current position
    pub depth: usize,
    pub algorithm: Algorithm,
    /// Search the root's successors in parallel
    pub parallel: bool,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(KonaneError::InvalidConfiguration {
                message: "search depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            algorithm: Algorithm::AlphaBeta,
            parallel: false,
        }
    }
}
