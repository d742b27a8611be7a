//! GitHub API payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use keeplog_change::{Commit, PullRequest};
use keeplog_git::{Author, Branch, FileContent, Tag};
use serde::{Deserialize, Serialize};

use crate::{GithubError, GithubResult};

/// Repository metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryInfo {
    pub(crate) default_branch: String,
}

/// A commit reference inside tag and branch payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitRef {
    pub(crate) sha: String,
}

/// Tag listing entry.
#[derive(Debug, Deserialize)]
pub(crate) struct TagInfo {
    name: String,
    commit: CommitRef,
}

impl From<TagInfo> for Tag {
    fn from(tag: TagInfo) -> Self {
        Tag::new(tag.name, tag.commit.sha)
    }
}

/// Branch payload.
#[derive(Debug, Deserialize)]
pub(crate) struct BranchInfo {
    name: String,
    commit: CommitRef,
}

impl From<BranchInfo> for Branch {
    fn from(branch: BranchInfo) -> Self {
        Branch::new(branch.name, branch.commit.sha)
    }
}

/// A GitHub account.
#[derive(Debug, Deserialize)]
pub(crate) struct User {
    login: String,
    #[serde(default)]
    html_url: String,
}

/// Git-level author of a commit.
#[derive(Debug, Deserialize)]
pub(crate) struct GitAuthor {
    name: String,
    date: DateTime<Utc>,
}

/// Git-level commit data.
#[derive(Debug, Deserialize)]
pub(crate) struct GitCommit {
    message: String,
    author: GitAuthor,
}

/// Commit payload.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitInfo {
    pub(crate) sha: String,
    #[serde(default)]
    html_url: String,
    commit: GitCommit,
    author: Option<User>,
}

impl From<CommitInfo> for Commit {
    fn from(info: CommitInfo) -> Self {
        let (author, author_url) = match info.author {
            Some(user) => (user.login, user.html_url),
            None => (info.commit.author.name, String::new()),
        };

        Commit::new(info.sha, info.commit.message, author, info.commit.author.date)
            .with_url(info.html_url)
            .with_author_url(author_url)
    }
}

/// Pull request payload.
#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestInfo {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    html_url: String,
    user: Option<User>,
    merged_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl From<PullRequestInfo> for PullRequest {
    fn from(info: PullRequestInfo) -> Self {
        let (author, author_url) = info
            .user
            .map(|user| (user.login, user.html_url))
            .unwrap_or_default();

        let mut pr = PullRequest::new(info.number, info.title, author, info.updated_at)
            .with_url(info.html_url)
            .with_author_url(author_url);
        if let Some(body) = info.body {
            pr = pr.with_body(body);
        }
        if let Some(merged_at) = info.merged_at {
            pr = pr.with_merged_at(merged_at);
        }
        pr
    }
}

/// Contents API payload for a file.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentInfo {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

impl ContentInfo {
    /// Decodes the file content.
    pub(crate) fn into_file(self) -> GithubResult<FileContent> {
        if self.encoding != "base64" {
            return Err(GithubError::Content(format!(
                "unsupported encoding \"{}\"",
                self.encoding
            )));
        }

        // The API wraps the encoded content every 60 characters.
        let encoded: String = self.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|err| GithubError::Content(err.to_string()))?;
        let content =
            String::from_utf8(bytes).map_err(|err| GithubError::Content(err.to_string()))?;

        Ok(FileContent {
            content,
            hash: self.sha,
        })
    }
}

/// Identity in a contents write request.
#[derive(Debug, Serialize)]
pub(crate) struct Identity<'a> {
    name: &'a str,
    email: &'a str,
}

impl<'a> From<&'a Author> for Identity<'a> {
    fn from(author: &'a Author) -> Self {
        Self {
            name: &author.name,
            email: &author.email,
        }
    }
}

/// Contents API write request.
#[derive(Debug, Serialize)]
pub(crate) struct PutContentRequest<'a> {
    pub(crate) message: &'a str,
    pub(crate) content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sha: Option<&'a str>,
    pub(crate) committer: Identity<'a>,
    pub(crate) author: Identity<'a>,
}

impl<'a> PutContentRequest<'a> {
    pub(crate) fn new(
        content: &str,
        message: &'a str,
        author: &'a Author,
        previous_hash: Option<&'a str>,
    ) -> Self {
        Self {
            message,
            content: STANDARD.encode(content),
            sha: previous_hash,
            committer: author.into(),
            author: author.into(),
        }
    }
}

/// Error payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}
