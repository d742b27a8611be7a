//! In-memory provider for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use keeplog_change::{Commit, PullRequest};
use keeplog_git::{
    Author, Branch, CommitRange, FileContent, GitError, GitResult, Provider, Tag,
};

/// Returns midnight UTC of a January 2021 day, plus `hour` hours.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, day, hour, 0, 0).unwrap()
}

/// A linear history held in memory.
///
/// Commits are stored newest first; the first one is the tip of `main`.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    commits: Vec<Commit>,
    tags: Vec<Tag>,
    pulls: HashMap<String, Vec<PullRequest>>,
    files: Mutex<HashMap<String, FileContent>>,
    revision: Mutex<u32>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a commit on top of the history.
    pub fn with_commit(mut self, sha: &str, message: &str, author: &str, date: DateTime<Utc>) -> Self {
        self.commits
            .insert(0, Commit::new(sha, message, author, date));
        self
    }

    /// Tags an existing commit; the newest tag must be added last.
    pub fn with_tag(mut self, name: &str, sha: &str) -> Self {
        self.tags.insert(0, Tag::new(name, sha));
        self
    }

    /// Associates a pull request with a commit.
    pub fn with_pull(mut self, sha: &str, pull: PullRequest) -> Self {
        self.pulls.entry(sha.to_string()).or_default().push(pull);
        self
    }

    /// Seeds a file.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().unwrap().insert(
            path.to_string(),
            FileContent {
                content: content.to_string(),
                hash: "h0".to_string(),
            },
        );
        self
    }

    fn position(&self, sha: &str) -> Option<usize> {
        self.commits
            .iter()
            .position(|commit| commit.sha == sha || commit.sha.starts_with(sha))
    }
}

impl Provider for MemoryProvider {
    fn tags(&self) -> GitResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn branch(&self, name: &str) -> GitResult<Branch> {
        match (name, self.commits.first()) {
            ("main", Some(tip)) => Ok(Branch::new(name, tip.sha.clone())),
            _ => Err(GitError::BranchNotFound(name.to_string())),
        }
    }

    fn default_branch(&self) -> GitResult<Branch> {
        self.branch("main")
    }

    fn commit(&self, sha: &str) -> GitResult<Commit> {
        self.position(sha)
            .map(|index| self.commits[index].clone())
            .ok_or_else(|| GitError::CommitNotFound(sha.to_string()))
    }

    fn commits_between(&self, range: &CommitRange) -> GitResult<Vec<Commit>> {
        let start = self
            .position(&range.start)
            .ok_or_else(|| GitError::CommitNotFound(range.start.clone()))?;
        let end = range.end.as_deref().and_then(|end| self.position(end));

        Ok(self.commits[start..]
            .iter()
            .take_while(|commit| {
                end.is_none_or(|end| self.commits[end].sha != commit.sha)
            })
            .filter(|commit| range.contains_date(commit.date))
            .cloned()
            .collect())
    }

    fn pull_requests_for_commit(&self, sha: &str) -> GitResult<Vec<PullRequest>> {
        Ok(self.pulls.get(sha).cloned().unwrap_or_default())
    }

    fn file(&self, path: &str, _reference: Option<&str>) -> GitResult<Option<FileContent>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn put_file(
        &self,
        path: &str,
        content: &str,
        _message: &str,
        _author: &Author,
        previous_hash: Option<&str>,
    ) -> GitResult<()> {
        let mut files = self.files.lock().unwrap();
        if let (Some(expected), Some(current)) = (previous_hash, files.get(path))
            && current.hash != expected
        {
            return Err(GitError::StaleFile {
                path: path.to_string(),
                expected: expected.to_string(),
                actual: current.hash.clone(),
            });
        }

        let mut revision = self.revision.lock().unwrap();
        *revision += 1;
        files.insert(
            path.to_string(),
            FileContent {
                content: content.to_string(),
                hash: format!("h{revision}"),
            },
        );
        Ok(())
    }
}
