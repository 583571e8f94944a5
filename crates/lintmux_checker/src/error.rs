//! Checker error types.

use thiserror::Error;

/// Errors that can occur on the checker side.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The output pattern failed to compile.
    #[error("Invalid output pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The external checker process could not be run.
    #[error("Checker invocation failed: {0}")]
    Invocation(String),

    /// I/O error while talking to the checker process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckerError {
    /// Creates an invocation error.
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }
}
