//! Configuration schema.

use std::fmt;
use std::path::Path;

use keeplog_format::Format;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where history is read from.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Changelog file settings.
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// Which history entries become changes.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Identity used when the changelog is committed back.
    #[serde(default)]
    pub commit: CommitConfig,
}

impl Config {
    /// Checks settings that cannot be expressed by the schema alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sources.only_commits && self.sources.only_pull_requests {
            return Err(ConfigError::Invalid(
                "only_commits and only_pull_requests are mutually exclusive".to_string(),
            ));
        }

        if self
            .sources
            .skip_authors
            .iter()
            .any(|author| author.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "skip_authors contains a blank entry".to_string(),
            ));
        }

        if self.repository.provider == ProviderKind::Github
            && (self.repository.owner.trim().is_empty() || self.repository.name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "the github provider needs repository.owner and repository.name".to_string(),
            ));
        }

        if self.commit.author_name.trim().is_empty() || self.commit.author_email.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "commit.author_name and commit.author_email must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// The kind of repository history is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// A repository on the local disk.
    #[default]
    Local,
    /// A repository hosted on GitHub.
    Github,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Github => write!(f, "github"),
        }
    }
}

/// Repository configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Which provider to use.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Path of the local repository.
    #[serde(default = "default_path")]
    pub path: String,

    /// GitHub repository owner.
    #[serde(default)]
    pub owner: String,

    /// GitHub repository name.
    #[serde(default)]
    pub name: String,

    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Branch used when no explicit start is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            path: default_path(),
            owner: String::new(),
            name: String::new(),
            api_url: default_api_url(),
            default_branch: None,
        }
    }
}

fn default_path() -> String {
    ".".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Changelog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Output file path.
    #[serde(default = "default_changelog_output")]
    pub output: String,

    /// Document format; inferred from the output extension when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl ChangelogConfig {
    /// Returns the configured format, or the one implied by the output path.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
            .unwrap_or_else(|| Format::from_path(Path::new(&self.output)))
    }
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            output: default_changelog_output(),
            format: None,
        }
    }
}

fn default_changelog_output() -> String {
    "CHANGELOG.md".to_string()
}

/// Source selection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Use commits only, never pull requests.
    #[serde(default)]
    pub only_commits: bool,

    /// Use pull requests only; commits without one are skipped.
    #[serde(default)]
    pub only_pull_requests: bool,

    /// Authors whose changes are left out.
    #[serde(default)]
    pub skip_authors: Vec<String>,

    /// Swap the start and end of a fully resolved range.
    #[serde(default)]
    pub compare_reverse: bool,
}

/// Commit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Author name of changelog commits.
    #[serde(default = "default_author_name")]
    pub author_name: String,

    /// Author email of changelog commits.
    #[serde(default = "default_author_email")]
    pub author_email: String,

    /// Commit message of changelog commits.
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            author_name: default_author_name(),
            author_email: default_author_email(),
            message: default_message(),
        }
    }
}

fn default_author_name() -> String {
    "keeplog".to_string()
}

fn default_author_email() -> String {
    "keeplog@users.noreply.github.com".to_string()
}

fn default_message() -> String {
    "Update changelog".to_string()
}
