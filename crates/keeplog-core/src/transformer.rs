//! Commit to change source selection.

use keeplog_change::{ChangeSource, Commit};
use keeplog_config::{ConfigError, SourcesConfig};
use tracing::debug;

use crate::{CoreResult, History};

/// Which kind of source a commit contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// The first associated pull request, else the commit.
    #[default]
    All,
    /// Always the commit.
    OnlyCommits,
    /// The first associated pull request; commits without one are skipped.
    OnlyPullRequests,
}

/// Validated transformer options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    mode: SourceMode,
    skip_authors: Vec<String>,
}

impl TransformOptions {
    /// Builds options from the mode flags and authors to leave out.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if both modes are enabled or an
    /// author is blank.
    pub fn new<I, S>(
        only_commits: bool,
        only_pull_requests: bool,
        skip_authors: I,
    ) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mode = match (only_commits, only_pull_requests) {
            (true, true) => {
                return Err(ConfigError::Invalid(
                    "only commits and only pull requests are mutually exclusive".to_string(),
                )
                .into());
            }
            (true, false) => SourceMode::OnlyCommits,
            (false, true) => SourceMode::OnlyPullRequests,
            (false, false) => SourceMode::All,
        };

        let mut normalized = Vec::new();
        for author in skip_authors {
            let author = author.as_ref().trim();
            if author.is_empty() {
                return Err(ConfigError::Invalid("skip author must not be blank".to_string()).into());
            }
            normalized.push(author.to_lowercase());
        }

        Ok(Self {
            mode,
            skip_authors: normalized,
        })
    }

    /// Builds options from the `[sources]` configuration section.
    ///
    /// # Errors
    ///
    /// See [`TransformOptions::new`].
    pub fn from_config(config: &SourcesConfig) -> CoreResult<Self> {
        Self::new(
            config.only_commits,
            config.only_pull_requests,
            &config.skip_authors,
        )
    }

    /// Returns the source mode.
    #[must_use]
    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Returns true if changes by `author` are left out.
    #[must_use]
    pub fn skips(&self, author: &str) -> bool {
        let author = author.trim().to_lowercase();
        self.skip_authors.iter().any(|skipped| *skipped == author)
    }
}

/// Turns commits into the sources their changes are attributed to.
pub struct Transformer<'a> {
    options: &'a TransformOptions,
}

impl<'a> Transformer<'a> {
    /// Creates a transformer.
    #[must_use]
    pub fn new(options: &'a TransformOptions) -> Self {
        Self { options }
    }

    /// Transforms the history, keeping its order.
    ///
    /// `progress` is called once per commit, whether or not it contributes
    /// a source.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching commits or pull requests fails.
    pub fn transform(
        &self,
        history: &History<'_>,
        progress: &mut dyn FnMut(&Commit),
    ) -> CoreResult<Vec<ChangeSource>> {
        let mut sources = Vec::new();

        for commit in history.commits()? {
            let selected = self.select(history, commit)?;
            progress(commit);

            let Some(source) = selected else {
                debug!(sha = %commit.short_sha(), "no pull request, skipping commit");
                continue;
            };
            if self.options.skips(source.author()) {
                debug!(source = %source, author = source.author(), "skipping author");
                continue;
            }
            sources.push(source);
        }

        Ok(sources)
    }

    fn select(&self, history: &History<'_>, commit: &Commit) -> CoreResult<Option<ChangeSource>> {
        if self.options.mode == SourceMode::OnlyCommits {
            return Ok(Some(commit.clone().into()));
        }

        let pull = history.pull_requests(&commit.sha)?.into_iter().next();
        Ok(match (self.options.mode, pull) {
            (_, Some(pull)) => Some(pull.into()),
            (SourceMode::OnlyPullRequests, None) => None,
            (_, None) => Some(commit.clone().into()),
        })
    }
}
