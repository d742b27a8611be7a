//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by repository providers.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// The repository has no working directory to write to.
    #[error("repository at {0} has no working directory")]
    Bare(PathBuf),

    /// Tag not found.
    #[error("tag not found: {0}")]
    TagNotFound(String),

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Commit not found.
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    /// The file changed since it was read.
    #[error("{path} was modified since it was read (expected {expected}, found {actual})")]
    StaleFile {
        /// The file path.
        path: String,
        /// The hash the caller read.
        expected: String,
        /// The hash currently stored.
        actual: String,
    },

    /// Remote provider error.
    #[error("remote error: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Returns true for errors caused by a named reference that does not
    /// exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TagNotFound(_) | Self::BranchNotFound(_) | Self::CommitNotFound(_)
        )
    }
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_repo_display() {
        let err = GitError::NotARepo(PathBuf::from("/tmp/not-git"));
        assert_eq!(err.to_string(), "not a git repository: /tmp/not-git");
    }

    #[test]
    fn test_tag_not_found_display() {
        let err = GitError::TagNotFound("v1.0.0".to_string());
        assert_eq!(err.to_string(), "tag not found: v1.0.0");
    }

    #[test]
    fn test_branch_not_found_display() {
        let err = GitError::BranchNotFound("develop".to_string());
        assert_eq!(err.to_string(), "branch not found: develop");
    }

    #[test]
    fn test_stale_file_display() {
        let err = GitError::StaleFile {
            path: "CHANGELOG.md".to_string(),
            expected: "aaa".to_string(),
            actual: "bbb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "CHANGELOG.md was modified since it was read (expected aaa, found bbb)"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(GitError::CommitNotFound("abc".to_string()).is_not_found());
        assert!(!GitError::NotARepo(PathBuf::from("/")).is_not_found());
    }
}
