//! Change model error types.

use thiserror::Error;

/// Errors raised while building the change model.
#[derive(Debug, Error)]
pub enum ChangeError {
    /// A change type name that is not one of the six known categories.
    #[error("unknown change type: {0}")]
    UnknownChangeType(String),

    /// A `Changes` collection was built without any change.
    #[error("changes must contain at least one change")]
    EmptyChanges,

    /// A `Changes` collection was built from more than one source.
    #[error("change from {found} does not belong to {expected}")]
    MixedSources {
        /// The source of the first change.
        expected: String,
        /// The offending source.
        found: String,
    },

    /// A release with the same name is already present.
    #[error("release {0} already exists")]
    ReleaseExists(String),

    /// No release with the given name is present.
    #[error("release {0} not found")]
    ReleaseNotFound(String),
}

/// Result type for change model operations.
pub type ChangeResult<T> = Result<T, ChangeError>;
