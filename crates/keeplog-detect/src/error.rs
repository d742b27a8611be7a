//! Detection error types.
//!
//! Every variant is an internal invariant failure: it is only reachable
//! when a detector's `supports` and `detect` disagree.

use keeplog_change::ChangeError;
use thiserror::Error;

/// Detection errors.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The `change-log` block was not found while detecting.
    #[error("no change-log block in {0}")]
    MissingBlock(String),

    /// The description is not a Conventional Commits header.
    #[error("{0} is not a conventional commit")]
    NotConventional(String),

    /// The Conventional Commits type has no change type mapping.
    #[error("unsupported conventional commit type \"{token}\" in {subject}")]
    UnknownType {
        /// The type token found in the header.
        token: String,
        /// The source being classified.
        subject: String,
    },

    /// The title does not start with a known prefix.
    #[error("no change prefix in the title of {0}")]
    NoPrefix(String),

    /// The extracted changes violate the model invariants.
    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// Result type for detection.
pub type DetectResult<T> = Result<T, DetectError>;
