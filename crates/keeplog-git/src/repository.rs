//! Local Git repository provider.

use std::collections::HashMap;
use std::path::Path;

use chrono::{TimeZone, Utc};
use git2::{BranchType, ErrorCode, Repository as Git2Repo, Signature, Sort};
use keeplog_change::{Commit, PullRequest};
use tracing::{debug, info};

use crate::{Author, Branch, CommitRange, FileContent, GitError, GitResult, Provider, Tag};

/// A [`Provider`] backed by a repository on disk.
///
/// Local repositories have no pull requests and no web URLs.
pub struct LocalRepository {
    inner: Git2Repo,
}

impl LocalRepository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Discovers the repository from the given directory upwards.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner =
            Git2Repo::discover(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    fn find_commit(&self, revision: &str) -> GitResult<git2::Commit<'_>> {
        self.inner
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(|_| GitError::CommitNotFound(revision.to_string()))
    }

    fn head_tree(&self) -> GitResult<Option<git2::Tree<'_>>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let author = commit.author();
    let date = Utc
        .timestamp_opt(author.when().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    Commit::new(
        commit.id().to_string(),
        commit.message().unwrap_or(""),
        author.name().unwrap_or("Unknown"),
        date,
    )
}

impl Provider for LocalRepository {
    fn tags(&self) -> GitResult<Vec<Tag>> {
        let names = self.inner.tag_names(None)?;

        let mut tags = Vec::new();
        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        for name in names.iter().flatten() {
            let commit = match self
                .inner
                .revparse_single(&format!("refs/tags/{name}"))
                .and_then(|object| object.peel_to_commit())
            {
                Ok(commit) => commit,
                Err(err) => {
                    debug!(tag = name, error = %err, "skipping tag without commit");
                    continue;
                }
            };
            revwalk.push(commit.id())?;
            tags.push((commit.id(), Tag::new(name, commit.id().to_string())));
        }

        if tags.is_empty() {
            return Ok(Vec::new());
        }

        // Children come before their parents, so the walk order is newest first.
        let mut positions = HashMap::new();
        for (position, oid) in revwalk.enumerate() {
            positions.entry(oid?).or_insert(position);
        }

        tags.sort_by(|(a_oid, a), (b_oid, b)| {
            let a_pos = positions.get(a_oid).copied().unwrap_or(usize::MAX);
            let b_pos = positions.get(b_oid).copied().unwrap_or(usize::MAX);
            a_pos.cmp(&b_pos).then_with(|| b.name.cmp(&a.name))
        });

        Ok(tags.into_iter().map(|(_, tag)| tag).collect())
    }

    fn branch(&self, name: &str) -> GitResult<Branch> {
        let branch = self
            .inner
            .find_branch(name, BranchType::Local)
            .or_else(|_| {
                self.inner
                    .find_branch(&format!("origin/{name}"), BranchType::Remote)
            })
            .map_err(|_| GitError::BranchNotFound(name.to_string()))?;
        let commit = branch.get().peel_to_commit()?;
        Ok(Branch::new(name, commit.id().to_string()))
    }

    fn default_branch(&self) -> GitResult<Branch> {
        let head = self
            .inner
            .head()
            .map_err(|_| GitError::BranchNotFound("HEAD".to_string()))?;
        let name = head.shorthand().unwrap_or("HEAD").to_string();
        let commit = head.peel_to_commit()?;
        Ok(Branch::new(name, commit.id().to_string()))
    }

    fn commit(&self, sha: &str) -> GitResult<Commit> {
        self.find_commit(sha).map(|commit| to_commit(&commit))
    }

    fn commits_between(&self, range: &CommitRange) -> GitResult<Vec<Commit>> {
        let start = self.find_commit(&range.start)?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start.id())?;

        if let Some(end) = &range.end {
            revwalk.hide(self.find_commit(end)?.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = to_commit(&self.inner.find_commit(oid?)?);
            if range.contains_date(commit.date) {
                commits.push(commit);
            }
        }

        debug!(start = %range.start, end = ?range.end, count = commits.len(), "listed commits");
        Ok(commits)
    }

    fn pull_requests_for_commit(&self, _sha: &str) -> GitResult<Vec<PullRequest>> {
        Ok(Vec::new())
    }

    fn file(&self, path: &str, reference: Option<&str>) -> GitResult<Option<FileContent>> {
        let tree = match reference {
            Some(reference) => self.find_commit(reference)?.tree()?,
            None => match self.head_tree()? {
                Some(tree) => tree,
                None => return Ok(None),
            },
        };

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let blob = entry.to_object(&self.inner)?.peel_to_blob()?;

        Ok(Some(FileContent {
            content: String::from_utf8_lossy(blob.content()).into_owned(),
            hash: blob.id().to_string(),
        }))
    }

    fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        author: &Author,
        previous_hash: Option<&str>,
    ) -> GitResult<()> {
        if let Some(expected) = previous_hash {
            let actual = self
                .file(path, None)?
                .map(|file| file.hash)
                .unwrap_or_default();
            if actual != expected {
                return Err(GitError::StaleFile {
                    path: path.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        let workdir = self
            .inner
            .workdir()
            .ok_or_else(|| GitError::Bare(self.inner.path().to_path_buf()))?;
        let target = workdir.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, content)?;

        let mut index = self.inner.index()?;
        index.add_path(Path::new(path))?;
        index.write()?;
        let tree = self.inner.find_tree(index.write_tree()?)?;

        let signature = Signature::now(&author.name, &author.email)?;
        let parent = match self.inner.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.inner.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        info!(path, sha = %oid, "committed file");
        Ok(())
    }
}
