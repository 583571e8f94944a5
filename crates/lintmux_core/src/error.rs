//! Engine error types.

use thiserror::Error;

/// Errors that can occur in the dispatch engine.
#[derive(Debug, Error)]
pub enum LintError {
    /// A definition with this name is already registered.
    #[error("Checker definition '{0}' is already registered")]
    DuplicateDefinition(String),

    /// A definition was asked to lint but lacks a syntax, command or pattern.
    #[error("Checker definition '{0}' is incomplete (missing syntax, command or pattern)")]
    IncompleteDefinition(String),

    /// The host context went away before running an exclusive job.
    #[error("Host context unavailable for exclusive checker '{0}'")]
    HostGone(String),

    /// Checker-side error.
    #[error("Checker error: {0}")]
    Checker(#[from] lintmux_checker::CheckerError),
}
