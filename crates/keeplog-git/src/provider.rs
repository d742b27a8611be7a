//! Provider trait.

use keeplog_change::{Commit, PullRequest};

use crate::{Author, Branch, CommitRange, FileContent, GitResult, Tag};

/// Read and write access to a hosted repository.
///
/// Implementations are blocking and may be moved across threads but are not
/// required to be shared between them. Named lookups that fail must report the
/// identifier that did not resolve through [`GitError::TagNotFound`],
/// [`GitError::BranchNotFound`] or [`GitError::CommitNotFound`].
///
/// [`GitError::TagNotFound`]: crate::GitError::TagNotFound
/// [`GitError::BranchNotFound`]: crate::GitError::BranchNotFound
/// [`GitError::CommitNotFound`]: crate::GitError::CommitNotFound
pub trait Provider: Send {
    /// Returns the tags, newest first.
    fn tags(&self) -> GitResult<Vec<Tag>>;

    /// Looks up a branch by name.
    fn branch(&self, name: &str) -> GitResult<Branch>;

    /// Returns the repository default branch.
    fn default_branch(&self) -> GitResult<Branch>;

    /// Looks up a commit by SHA (or any unambiguous revision).
    fn commit(&self, sha: &str) -> GitResult<Commit>;

    /// Lists the commits of a range, newest first.
    fn commits_between(&self, range: &CommitRange) -> GitResult<Vec<Commit>>;

    /// Returns the pull requests associated with a commit.
    fn pull_requests_for_commit(&self, sha: &str) -> GitResult<Vec<PullRequest>>;

    /// Reads a file at a reference, or at the default branch when `reference`
    /// is `None`. Returns `None` when the file does not exist.
    fn file(&self, path: &str, reference: Option<&str>) -> GitResult<Option<FileContent>>;

    /// Writes a file and records it as a commit.
    ///
    /// `previous_hash` is the [`FileContent::hash`] the content was based on;
    /// the write is rejected if the stored file no longer matches it.
    fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        author: &Author,
        previous_hash: Option<&str>,
    ) -> GitResult<()>;
}
