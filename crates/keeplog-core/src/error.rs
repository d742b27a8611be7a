//! Core error types.

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid options or configuration.
    #[error("config error: {0}")]
    Config(#[from] keeplog_config::ConfigError),

    /// Repository error, including names that did not resolve.
    #[error("git error: {0}")]
    Git(#[from] keeplog_git::GitError),

    /// A detector broke its own contract.
    #[error("detection error: {0}")]
    Detect(#[from] keeplog_detect::DetectError),

    /// The existing changelog could not be read.
    #[error("format error: {0}")]
    Format(#[from] keeplog_format::FormatError),

    /// The change model rejected an operation.
    #[error("change error: {0}")]
    Change(#[from] keeplog_change::ChangeError),

    /// The resolved scope has no start commit.
    #[error("the scope has no start commit")]
    IncompleteScope,

    /// There is no "Unreleased" release to promote.
    #[error("There is nothing to release")]
    NothingToRelease,

    /// The target release name is taken.
    #[error("Release {0} already exists and can't be released again")]
    AlreadyReleased(String),
}

impl CoreError {
    /// Returns true if a named tag, branch or commit did not resolve.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Git(err) if err.is_not_found())
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use keeplog_git::GitError;

    #[test]
    fn test_merge_error_messages() {
        assert_eq!(
            CoreError::NothingToRelease.to_string(),
            "There is nothing to release"
        );
        assert_eq!(
            CoreError::AlreadyReleased("1.0.0".to_string()).to_string(),
            "Release 1.0.0 already exists and can't be released again"
        );
    }

    #[test]
    fn test_is_resolution() {
        let err = CoreError::from(GitError::TagNotFound("v9.9.9".to_string()));
        assert!(err.is_resolution());
        assert!(err.to_string().contains("v9.9.9"));
        assert!(!CoreError::NothingToRelease.is_resolution());
    }
}
