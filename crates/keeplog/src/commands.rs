//! Command implementations and the helpers they share.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use keeplog_config::{Config, ProviderKind, find_and_load_config, load_config};
use keeplog_format::{ChangelogSource, Format, source_for};
use keeplog_git::{Author, FileContent, LocalRepository, Provider};
use keeplog_github::GithubProvider;
use tracing::{debug, info};

pub mod generate;
pub mod init;
pub mod release;

/// Loads the explicit configuration file, or the discovered one, or the
/// defaults when there is none.
pub fn load(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()));
    }

    match find_and_load_config() {
        Ok(config) => Ok(config),
        Err(err) if err.is_not_found() => {
            debug!("no configuration file, using defaults");
            Ok(Config::default())
        }
        Err(err) => Err(err).context("failed to load configuration"),
    }
}

/// Opens the configured repository provider.
pub fn open_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let repository = &config.repository;
    match repository.provider {
        ProviderKind::Local => {
            let local = LocalRepository::discover(&repository.path)
                .context("failed to open git repository")?;
            debug!(path = %local.path().display(), "using local repository");
            Ok(Box::new(local))
        }
        ProviderKind::Github => {
            let github =
                GithubProvider::new(&repository.api_url, &repository.owner, &repository.name)
                    .context("failed to create GitHub client")?;
            debug!(repository = %github.slug(), "using GitHub repository");
            Ok(Box::new(github))
        }
    }
}

/// The changelog file, read from disk or through the provider.
pub struct Changelog {
    path: String,
    format: Format,
    through_provider: bool,
    existing: Option<FileContent>,
}

impl Changelog {
    /// Reads the changelog. A missing file is not an error.
    pub fn open(
        path: &str,
        format: Format,
        provider: &dyn Provider,
        through_provider: bool,
    ) -> Result<Self> {
        let existing = if through_provider {
            provider
                .file(path, None)
                .with_context(|| format!("failed to read {path} from the repository"))?
        } else {
            match fs::read_to_string(path) {
                Ok(content) => Some(FileContent {
                    content,
                    hash: String::new(),
                }),
                Err(err) if err.kind() == ErrorKind::NotFound => None,
                Err(err) => return Err(err).with_context(|| format!("failed to read {path}")),
            }
        };

        if existing.is_none() {
            info!(path, "no existing changelog, starting from scratch");
        }

        Ok(Self {
            path: path.to_string(),
            format,
            through_provider,
            existing,
        })
    }

    /// Returns the parser for the current content. An undated
    /// "Unreleased" heading is read as a release on `undated_day`.
    pub fn source(&self, undated_day: NaiveDate) -> Box<dyn ChangelogSource> {
        source_for(
            self.format,
            self.existing.as_ref().map(|file| file.content.clone()),
            undated_day,
        )
    }

    /// Writes `content` unless it equals the current content. Returns true
    /// if something was written.
    pub fn save(&self, content: &str, provider: &dyn Provider, config: &Config) -> Result<bool> {
        if self
            .existing
            .as_ref()
            .is_some_and(|file| file.content == content)
        {
            info!(path = %self.path, "changelog is up to date");
            return Ok(false);
        }

        if self.through_provider {
            let author = Author::new(&config.commit.author_name, &config.commit.author_email);
            provider
                .put_file(
                    &self.path,
                    content,
                    &config.commit.message,
                    &author,
                    self.existing.as_ref().map(|file| file.hash.as_str()),
                )
                .with_context(|| format!("failed to commit {}", self.path))?;
        } else {
            fs::write(&self.path, content)
                .with_context(|| format!("failed to write {}", self.path))?;
        }

        info!(path = %self.path, "changelog written");
        Ok(true)
    }
}

/// Parses a `YYYY-MM-DD` day.
pub fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

/// Parses an RFC 3339 instant, or a day meaning its first second.
pub fn parse_since(value: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(value, NaiveTime::MIN)
}

/// Parses an RFC 3339 instant, or a day meaning its last second.
pub fn parse_until(value: &str) -> Result<DateTime<Utc>, String> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    parse_instant(value, end_of_day)
}

fn parse_instant(value: &str, time: NaiveTime) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    parse_day(value).map(|day| day.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2021-01-04").unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
        );
        assert!(parse_day("04/01/2021").is_err());
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(
            parse_since("2021-01-04").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_until("2021-01-04").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 4, 23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_since("2021-01-04T10:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 4, 8, 0, 0).unwrap()
        );
        assert!(parse_until("yesterday").is_err());
    }
}
