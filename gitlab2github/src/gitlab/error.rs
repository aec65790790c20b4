//! GitLab client error types.

use thiserror::Error;

/// Errors that can occur while talking to the GitLab API.
#[derive(Debug, Error)]
pub enum GitlabError {
    /// The token was rejected.
    #[error("GitLab authentication failed: token rejected (HTTP 401)")]
    Auth,

    /// The API returned a non-success status.
    #[error("GitLab API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection, timeout, malformed body).
    #[error("GitLab request failed: {0}")]
    Http(#[from] reqwest::Error),
}
