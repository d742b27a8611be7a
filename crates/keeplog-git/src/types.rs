//! Values exchanged with providers.

use chrono::{DateTime, Utc};

/// A tag and the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The tag name.
    pub name: String,
    /// The SHA of the tagged commit.
    pub sha: String,
}

impl Tag {
    /// Creates a new tag.
    #[must_use]
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: sha.into(),
        }
    }
}

/// A branch and the commit at its tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// The branch name.
    pub name: String,
    /// The SHA of the tip commit.
    pub sha: String,
}

impl Branch {
    /// Creates a new branch.
    #[must_use]
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: sha.into(),
        }
    }
}

/// Bounds of a history fetch.
///
/// Commits reachable from `start` are listed, stopping at `end` (excluded)
/// when given. Commits authored outside `after..=before` are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRange {
    /// Newest commit of the range.
    pub start: String,
    /// Oldest boundary, excluded from the result.
    pub end: Option<String>,
    /// Drop commits authored before this instant.
    pub after: Option<DateTime<Utc>>,
    /// Drop commits authored after this instant.
    pub before: Option<DateTime<Utc>>,
}

impl CommitRange {
    /// Creates a range starting at `start` with no other bound.
    #[must_use]
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Self::default()
        }
    }

    /// Sets the excluded end commit.
    #[must_use]
    pub fn until(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Sets the date bounds.
    #[must_use]
    pub fn between_dates(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.after = after;
        self.before = before;
        self
    }

    /// Returns true if `date` lies within the date bounds.
    #[must_use]
    pub fn contains_date(&self, date: DateTime<Utc>) -> bool {
        self.after.is_none_or(|after| date >= after)
            && self.before.is_none_or(|before| date <= before)
    }
}

/// A file read from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// The file content.
    pub content: String,
    /// A content hash, passed back to `put_file` to detect concurrent edits.
    pub hash: String,
}

/// The identity used when writing commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// The author name.
    pub name: String,
    /// The author email.
    pub email: String,
}

impl Author {
    /// Creates a new author.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
