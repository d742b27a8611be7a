//! Commit history of a scope.

use std::cell::OnceCell;

use keeplog_change::{Commit, PullRequest};
use keeplog_git::{CommitRange, Provider};
use tracing::info;

use crate::CoreResult;

/// The commits of a range, fetched on first use.
pub struct History<'a> {
    provider: &'a dyn Provider,
    range: CommitRange,
    commits: OnceCell<Vec<Commit>>,
}

impl<'a> History<'a> {
    /// Creates a history over `range`. Nothing is fetched yet.
    #[must_use]
    pub fn new(provider: &'a dyn Provider, range: CommitRange) -> Self {
        Self {
            provider,
            range,
            commits: OnceCell::new(),
        }
    }

    /// Returns the range this history covers.
    #[must_use]
    pub fn range(&self) -> &CommitRange {
        &self.range
    }

    /// Returns the commits in provider order, fetching them once.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn commits(&self) -> CoreResult<&[Commit]> {
        if let Some(commits) = self.commits.get() {
            return Ok(commits);
        }

        let commits = self.provider.commits_between(&self.range)?;
        info!(
            count = commits.len(),
            start = %self.range.start,
            end = ?self.range.end,
            "fetched history"
        );
        Ok(self.commits.get_or_init(|| commits))
    }

    /// Returns the pull requests associated with a commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails.
    pub fn pull_requests(&self, sha: &str) -> CoreResult<Vec<PullRequest>> {
        Ok(self.provider.pull_requests_for_commit(sha)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryProvider, at};

    #[test]
    fn test_commits_in_provider_order() {
        let provider = MemoryProvider::new()
            .with_commit("a1", "one", "alice", at(1, 0))
            .with_commit("b2", "two", "alice", at(2, 0))
            .with_commit("c3", "three", "alice", at(3, 0));
        let history = History::new(&provider, CommitRange::new("c3").until("a1"));

        let shas: Vec<_> = history
            .commits()
            .unwrap()
            .iter()
            .map(|commit| commit.sha.as_str())
            .collect();
        assert_eq!(shas, ["c3", "b2"]);
        assert_eq!(history.commits().unwrap().len(), 2);
    }

    #[test]
    fn test_commits_error_propagates() {
        let provider = MemoryProvider::new();
        let history = History::new(&provider, CommitRange::new("missing"));
        assert!(history.commits().unwrap_err().is_resolution());
    }
}
