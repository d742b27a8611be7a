//! Commit range resolution.

use std::cell::OnceCell;

use chrono::{DateTime, Utc};
use keeplog_change::Commit;
use keeplog_git::{CommitRange, GitError, Provider, Tag};
use tracing::debug;

use crate::CoreResult;

/// The commit range of one changelog run.
///
/// `commit_start` is the newest commit of the range and `commit_end` the
/// excluded older boundary. Without an end the range covers the full history
/// behind the start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Newest commit of the range.
    pub commit_start: Option<Commit>,
    /// Excluded older boundary.
    pub commit_end: Option<Commit>,
    /// Branch the start was taken from.
    pub branch: Option<String>,
    /// Tag the start was taken from.
    pub tag_start: Option<Tag>,
    /// Tag the end was taken from.
    pub tag_end: Option<Tag>,
}

impl Scope {
    /// Returns true if both ends of the range are set.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.commit_start.is_some() && self.commit_end.is_some()
    }

    /// Merges `other` into this scope; fields set in `other` win.
    #[must_use]
    pub fn override_with(&self, other: &Self) -> Self {
        Self {
            commit_start: other
                .commit_start
                .clone()
                .or_else(|| self.commit_start.clone()),
            commit_end: other.commit_end.clone().or_else(|| self.commit_end.clone()),
            branch: other.branch.clone().or_else(|| self.branch.clone()),
            tag_start: other.tag_start.clone().or_else(|| self.tag_start.clone()),
            tag_end: other.tag_end.clone().or_else(|| self.tag_end.clone()),
        }
    }

    /// Swaps the start and end commits. Tags and branch are kept.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            commit_start: self.commit_end.clone(),
            commit_end: self.commit_start.clone(),
            ..self.clone()
        }
    }

    /// Returns the name of the release this scope describes, if tagged.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_start.as_ref().map(|tag| tag.name.as_str())
    }

    /// Builds the history range, or `None` without a start commit.
    #[must_use]
    pub fn range(
        &self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Option<CommitRange> {
        let start = self.commit_start.as_ref()?;
        let mut range = CommitRange::new(start.sha.clone()).between_dates(after, before);
        if let Some(end) = &self.commit_end {
            range = range.until(end.sha.clone());
        }
        Some(range)
    }
}

/// The user-supplied, possibly partial, description of a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInputs {
    /// Tag whose release is described.
    pub tag: Option<String>,
    /// Tag to compare against instead of the next older one.
    pub tag_next: Option<String>,
    /// Explicit start commit.
    pub commit_start: Option<String>,
    /// Explicit end commit.
    pub commit_end: Option<String>,
    /// Branch used when no start is given.
    pub branch: Option<String>,
    /// Swap the ends of a full scope.
    pub compare_reverse: bool,
}

/// Resolves [`ScopeInputs`] against a provider.
pub struct ScopeResolver<'a> {
    provider: &'a dyn Provider,
    tags: OnceCell<Vec<Tag>>,
}

impl<'a> ScopeResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(provider: &'a dyn Provider) -> Self {
        Self {
            provider,
            tags: OnceCell::new(),
        }
    }

    /// Resolves the inputs into a scope.
    ///
    /// Explicit tags come first, then explicit commits, then the explicit
    /// next tag. A missing start falls back to the branch tip, and a missing
    /// end falls back to the most recent tag unless a tag was named.
    ///
    /// # Errors
    ///
    /// Returns a resolution error naming the first tag, branch or commit
    /// that does not exist.
    pub fn resolve(&self, inputs: &ScopeInputs) -> CoreResult<Scope> {
        let mut scope = Scope::default();

        if let Some(name) = &inputs.tag {
            let (tag, older) = self.tag_with_older(name)?;
            scope.commit_start = Some(self.provider.commit(&tag.sha)?);
            scope.tag_start = Some(tag);

            if inputs.tag_next.is_none()
                && let Some(older) = older
            {
                scope.commit_end = Some(self.provider.commit(&older.sha)?);
                scope.tag_end = Some(older);
            }
        }

        let explicit = Scope {
            commit_start: self.commit(inputs.commit_start.as_deref())?,
            commit_end: self.commit(inputs.commit_end.as_deref())?,
            ..Scope::default()
        };
        scope = scope.override_with(&explicit);

        if let Some(name) = &inputs.tag_next {
            let (tag, _) = self.tag_with_older(name)?;
            let next = Scope {
                commit_end: Some(self.provider.commit(&tag.sha)?),
                tag_end: Some(tag),
                ..Scope::default()
            };
            scope = scope.override_with(&next);
        }

        let branch = match &inputs.branch {
            Some(name) => Some(self.provider.branch(name)?),
            None => None,
        };

        if scope.commit_start.is_none() {
            let branch = match branch {
                Some(branch) => branch,
                None => self.provider.default_branch()?,
            };
            scope.commit_start = Some(self.provider.commit(&branch.sha)?);
            scope.branch = Some(branch.name);
        } else if let Some(branch) = branch {
            scope.branch = Some(branch.name);
        }

        if scope.commit_end.is_none()
            && inputs.tag.is_none()
            && let Some(latest) = self.tags()?.first().cloned()
        {
            scope.commit_end = Some(self.provider.commit(&latest.sha)?);
            scope.tag_end = Some(latest);
        }

        if inputs.compare_reverse && scope.is_full() {
            scope = scope.reversed();
        }

        debug!(
            start = scope.commit_start.as_ref().map(|commit| commit.short_sha()),
            end = scope.commit_end.as_ref().map(|commit| commit.short_sha()),
            tag = scope.tag_name(),
            "resolved scope"
        );
        Ok(scope)
    }

    fn tags(&self) -> CoreResult<&[Tag]> {
        if let Some(tags) = self.tags.get() {
            return Ok(tags);
        }
        let tags = self.provider.tags()?;
        Ok(self.tags.get_or_init(|| tags))
    }

    /// Finds a tag and the tag just older than it.
    fn tag_with_older(&self, name: &str) -> CoreResult<(Tag, Option<Tag>)> {
        let tags = self.tags()?;
        let index = tags
            .iter()
            .position(|tag| tag.name == name)
            .ok_or_else(|| GitError::TagNotFound(name.to_string()))?;
        Ok((tags[index].clone(), tags.get(index + 1).cloned()))
    }

    fn commit(&self, sha: Option<&str>) -> CoreResult<Option<Commit>> {
        sha.map(|sha| self.provider.commit(sha))
            .transpose()
            .map_err(Into::into)
    }
}
