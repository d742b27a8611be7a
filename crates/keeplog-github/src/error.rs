//! GitHub error types.

use keeplog_git::GitError;
use thiserror::Error;

/// Errors raised while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The request could not be sent or its response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API returned {status} for {url}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
        /// The error message from the response body.
        message: String,
    },

    /// File content could not be decoded.
    #[error("invalid file content: {0}")]
    Content(String),
}

impl GithubError {
    /// Returns true if the API answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<GithubError> for GitError {
    fn from(err: GithubError) -> Self {
        GitError::Remote(Box::new(err))
    }
}

/// Result type for GitHub operations.
pub type GithubResult<T> = Result<T, GithubError>;
