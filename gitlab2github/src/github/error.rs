//! Destination writer error types.

use thiserror::Error;

/// Errors that can occur while writing to the destination repository.
#[derive(Debug, Error)]
pub enum WriterError {
    /// GitHub API error, including rejected tokens and HTTP failures.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    /// Destination rejected an operation outside the GitHub API path.
    #[error("{message}")]
    Other { message: String },
}
