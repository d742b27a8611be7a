//! Change sources: commits and pull requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as retrieved from a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit hash (SHA).
    pub sha: String,

    /// The full commit message (subject + body).
    pub message: String,

    /// Web URL of the commit, empty when unknown.
    pub url: String,

    /// The author handle (login, or name for local repositories).
    pub author: String,

    /// Web URL of the author, empty when unknown.
    pub author_url: String,

    /// The authored date.
    pub date: DateTime<Utc>,
}

impl Commit {
    /// Creates a new commit without URLs.
    #[must_use]
    pub fn new(
        sha: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
            url: String::new(),
            author: author.into(),
            author_url: String::new(),
            date,
        }
    }

    /// Sets the commit URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the author URL.
    #[must_use]
    pub fn with_author_url(mut self, url: impl Into<String>) -> Self {
        self.author_url = url.into();
        self
    }

    /// Returns the first line of the commit message (the subject).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Returns the short hash (first 7 characters).
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// A pull request associated with one or more commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number.
    pub number: u64,

    /// The pull request title.
    pub title: String,

    /// The pull request body, if any.
    pub body: Option<String>,

    /// Web URL of the pull request, empty when unknown.
    pub url: String,

    /// The author login.
    pub author: String,

    /// Web URL of the author, empty when unknown.
    pub author_url: String,

    /// When the pull request was merged.
    pub merged_at: Option<DateTime<Utc>>,

    /// When the pull request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PullRequest {
    /// Creates a new pull request without body, URLs or merge time.
    #[must_use]
    pub fn new(
        number: u64,
        title: impl Into<String>,
        author: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            body: None,
            url: String::new(),
            author: author.into(),
            author_url: String::new(),
            merged_at: None,
            updated_at,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the pull request URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the author URL.
    #[must_use]
    pub fn with_author_url(mut self, url: impl Into<String>) -> Self {
        self.author_url = url.into();
        self
    }

    /// Sets the merge time.
    #[must_use]
    pub fn with_merged_at(mut self, merged_at: DateTime<Utc>) -> Self {
        self.merged_at = Some(merged_at);
        self
    }
}

/// The kind of a [`ChangeSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A commit.
    Commit,
    /// A pull request.
    PullRequest,
}

/// Something that changes may be attributed to.
///
/// Two sources are equal when their ids are equal; content is not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSource {
    /// A single commit.
    Commit(Commit),
    /// A pull request.
    PullRequest(PullRequest),
}

impl ChangeSource {
    /// Returns the stable identifier: the SHA for commits, the number for pull requests.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Commit(commit) => commit.sha.clone(),
            Self::PullRequest(pr) => pr.number.to_string(),
        }
    }

    /// Returns the source kind.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Commit(_) => SourceKind::Commit,
            Self::PullRequest(_) => SourceKind::PullRequest,
        }
    }

    /// Returns a short human label: the short SHA or `#<number>`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Commit(commit) => commit.short_sha().to_string(),
            Self::PullRequest(pr) => format!("#{}", pr.number),
        }
    }

    /// Returns the web URL, empty when unknown.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.url,
            Self::PullRequest(pr) => &pr.url,
        }
    }

    /// Returns the single-line title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Commit(commit) => commit.subject(),
            Self::PullRequest(pr) => pr.title.lines().next().unwrap_or(""),
        }
    }

    /// Returns the full free-text description.
    ///
    /// For pull requests without a body this falls back to the title.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.message,
            Self::PullRequest(pr) => match pr.body.as_deref() {
                Some(body) if !body.trim().is_empty() => body,
                _ => &pr.title,
            },
        }
    }

    /// Returns the author handle.
    #[must_use]
    pub fn author(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.author,
            Self::PullRequest(pr) => &pr.author,
        }
    }

    /// Returns the author URL, empty when unknown.
    #[must_use]
    pub fn author_url(&self) -> &str {
        match self {
            Self::Commit(commit) => &commit.author_url,
            Self::PullRequest(pr) => &pr.author_url,
        }
    }

    /// Returns the timestamp: authored date for commits, merge time
    /// (or last update) for pull requests.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Self::Commit(commit) => commit.date,
            Self::PullRequest(pr) => pr.merged_at.unwrap_or(pr.updated_at),
        }
    }

    /// Returns true if both sources have the same kind and id.
    #[must_use]
    pub fn is_same_source(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self == other
    }
}

impl PartialEq for ChangeSource {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ChangeSource {}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit(commit) => write!(f, "commit {}", commit.short_sha()),
            Self::PullRequest(pr) => write!(f, "pull request #{}", pr.number),
        }
    }
}

impl From<Commit> for ChangeSource {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}

impl From<PullRequest> for ChangeSource {
    fn from(pr: PullRequest) -> Self {
        Self::PullRequest(pr)
    }
}
