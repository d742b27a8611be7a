//! GitHub REST client.

use std::time::Duration;

use keeplog_change::{Commit, PullRequest};
use keeplog_git::{Author, Branch, CommitRange, FileContent, GitError, GitResult, Provider, Tag};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dto::{
    BranchInfo, CommitInfo, ContentInfo, ErrorBody, PullRequestInfo, PutContentRequest,
    RepositoryInfo, TagInfo,
};
use crate::{GithubError, GithubResult};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;

/// A [`Provider`] for one GitHub repository.
pub struct GithubProvider {
    client: Client,
    api_url: String,
    owner: String,
    name: String,
}

impl GithubProvider {
    /// Creates a provider with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> GithubResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self::with_client(client, api_url, owner, name))
    }

    /// Creates a provider over a pre-built client, for example one carrying
    /// authentication headers.
    #[must_use]
    pub fn with_client(
        client: Client,
        api_url: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the `owner/name` slug.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_url, self.owner, self.name)
        } else {
            format!(
                "{}/repos/{}/{}/{}",
                self.api_url,
                self.owner,
                self.name,
                path.trim_start_matches('/')
            )
        }
    }

    fn send<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> GithubResult<T> {
        debug!(url, "GitHub request");
        let response = request
            .header("Accept", "application/vnd.github+json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        Ok(response.json()?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> GithubResult<T> {
        let url = self.url(path);
        self.send(&url, self.client.get(&url).query(query))
    }

    /// Fetches pages of a listing until `keep` returns false for an item or
    /// a short page is returned. Items after the rejected one are dropped.
    fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        mut keep: impl FnMut(&T) -> bool,
    ) -> GithubResult<Vec<T>> {
        let mut items = Vec::new();

        for page in 1.. {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", PER_PAGE.to_string()));
            page_query.push(("page", page.to_string()));

            let batch: Vec<T> = self.get(path, &page_query)?;
            let full = batch.len() == PER_PAGE;

            for item in batch {
                if !keep(&item) {
                    return Ok(items);
                }
                items.push(item);
            }

            if !full {
                break;
            }
        }

        Ok(items)
    }
}

/// Maps a 404 to the resolution error built by `not_found`.
fn resolve<T>(result: GithubResult<T>, not_found: impl FnOnce() -> GitError) -> GitResult<T> {
    result.map_err(|err| match err {
        err if err.is_not_found() => not_found(),
        GithubError::Status { status: 422, .. } => not_found(),
        err => err.into(),
    })
}

impl Provider for GithubProvider {
    fn tags(&self) -> GitResult<Vec<Tag>> {
        let tags: Vec<TagInfo> = self.paginate("tags", &[], |_| true)?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    fn branch(&self, name: &str) -> GitResult<Branch> {
        let branch: BranchInfo = resolve(self.get(&format!("branches/{name}"), &[]), || {
            GitError::BranchNotFound(name.to_string())
        })?;
        Ok(branch.into())
    }

    fn default_branch(&self) -> GitResult<Branch> {
        let info: RepositoryInfo = self.get("", &[])?;
        self.branch(&info.default_branch)
    }

    fn commit(&self, sha: &str) -> GitResult<Commit> {
        let info: CommitInfo = resolve(self.get(&format!("commits/{sha}"), &[]), || {
            GitError::CommitNotFound(sha.to_string())
        })?;
        Ok(info.into())
    }

    fn commits_between(&self, range: &CommitRange) -> GitResult<Vec<Commit>> {
        let end = match &range.end {
            Some(end) => Some(self.commit(end)?.sha),
            None => None,
        };

        let mut query = vec![("sha", range.start.clone())];
        if let Some(after) = range.after {
            query.push(("since", after.to_rfc3339()));
        }
        if let Some(before) = range.before {
            query.push(("until", before.to_rfc3339()));
        }

        let commits: Vec<CommitInfo> = resolve(
            self.paginate("commits", &query, |info: &CommitInfo| {
                end.as_deref() != Some(info.sha.as_str())
            }),
            || GitError::CommitNotFound(range.start.clone()),
        )?;

        let commits: Vec<Commit> = commits
            .into_iter()
            .map(Commit::from)
            .filter(|commit| range.contains_date(commit.date))
            .collect();

        debug!(repository = %self.slug(), count = commits.len(), "listed commits");
        Ok(commits)
    }

    fn pull_requests_for_commit(&self, sha: &str) -> GitResult<Vec<PullRequest>> {
        let pulls: Vec<PullRequestInfo> = resolve(self.get(&format!("commits/{sha}/pulls"), &[]), || {
            GitError::CommitNotFound(sha.to_string())
        })?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    fn file(&self, path: &str, reference: Option<&str>) -> GitResult<Option<FileContent>> {
        let query: Vec<(&str, String)> = reference
            .map(|reference| vec![("ref", reference.to_string())])
            .unwrap_or_default();

        match self.get::<ContentInfo>(&format!("contents/{path}"), &query) {
            Ok(info) => Ok(Some(info.into_file()?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        author: &Author,
        previous_hash: Option<&str>,
    ) -> GitResult<()> {
        let url = self.url(&format!("contents/{path}"));
        let body = PutContentRequest::new(content, message, author, previous_hash);

        let result: GithubResult<serde_json::Value> =
            self.send(&url, self.client.put(&url).json(&body));
        match result {
            Ok(_) => Ok(()),
            Err(GithubError::Status { status: 409, .. }) => Err(GitError::StaleFile {
                path: path.to_string(),
                expected: previous_hash.unwrap_or_default().to_string(),
                actual: "a newer revision".to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
