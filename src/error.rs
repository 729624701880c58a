//! Error types for the Konane agent

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KonaneError {
    /// A board read or write that would leave the board in an invalid state
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl KonaneError {
    pub(crate) fn out_of_bounds(x: usize, y: usize, width: usize, height: usize) -> Self {
        KonaneError::InvalidOperation(format!(
            "cell ({}, {}) is outside the {}x{} board",
            x, y, width, height
        ))
    }
}

pub type Result<T> = std::result::Result<T, KonaneError>;
