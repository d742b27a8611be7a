//! Merging releases into an existing changelog.

use chrono::NaiveDate;
use keeplog_change::{Release, Releases};
use keeplog_format::ChangelogSource;
use tracing::{debug, info};

use crate::{CoreError, CoreResult};

/// Merges analyzed releases into a parsed changelog.
///
/// Results are not sorted; call [`Releases::sort`] before rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manipulator;

impl Manipulator {
    /// Creates a manipulator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Adds `release` to the document, or replaces the release of the same
    /// name when its changes differ. Other releases are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn update(&self, source: &dyn ChangelogSource, release: Release) -> CoreResult<Releases> {
        let releases = source.releases()?;

        if !releases.has(release.name()) {
            info!(release = release.name(), "adding release");
            return Ok(releases.add(release)?);
        }

        let updated = releases.update(release)?;
        if updated == releases {
            debug!("release unchanged");
        } else {
            info!("release replaced");
        }
        Ok(updated)
    }

    /// Renames the "Unreleased" release to `name`, dated `day`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NothingToRelease`] without an "Unreleased"
    /// release, and [`CoreError::AlreadyReleased`] if `name` is taken.
    pub fn release(
        &self,
        source: &dyn ChangelogSource,
        name: &str,
        day: NaiveDate,
    ) -> CoreResult<Releases> {
        let releases = source.releases()?;

        if releases.unreleased().is_none() {
            return Err(CoreError::NothingToRelease);
        }
        if releases.has(name) {
            return Err(CoreError::AlreadyReleased(name.to_string()));
        }

        let promoted = Releases::from_releases(releases.iter().map(|release| {
            if release.is_unreleased() {
                release.renamed(name, day)
            } else {
                release.clone()
            }
        }))?;

        info!(release = name, %day, "promoted unreleased changes");
        Ok(promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::at;
    use keeplog_change::{Change, ChangeSource, ChangeType, Changes, PullRequest};
    use keeplog_format::{EmptySource, MarkdownRenderer, MarkdownSource, Renderer};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn change(number: u64, change_type: ChangeType, description: &str) -> Changes {
        let source: ChangeSource = PullRequest::new(number, description, "bob", at(2, 0))
            .with_url(format!("https://github.com/o/r/pull/{number}"))
            .into();
        Changes::single(Change::new(source, change_type, description))
    }

    fn unreleased(changes: Vec<Changes>) -> Release {
        let mut release = Release::unreleased(day(5));
        for changes in changes {
            release.add(changes);
        }
        release
    }

    fn document(releases: Vec<Release>) -> MarkdownSource {
        let releases = Releases::from_releases(releases).unwrap();
        MarkdownSource::new(MarkdownRenderer::new().render_releases(&releases))
    }

    #[test]
    fn test_update_empty_source() {
        let release = unreleased(vec![
            change(1, ChangeType::Added, "One"),
            change(2, ChangeType::Fixed, "Two"),
        ]);

        let releases = Manipulator::new()
            .update(&EmptySource, release.clone())
            .unwrap();

        assert_eq!(releases.count(), 1);
        let merged = releases.unreleased().unwrap();
        assert_eq!(merged.count(), 2);
        assert_eq!(*merged, release);
    }

    #[test]
    fn test_update_keeps_other_releases_in_order() {
        let mut old = Release::new("0.1.0", day(1));
        old.add(change(1, ChangeType::Added, "Old"));
        let mut older = Release::new("0.0.1", day(1));
        older.add(change(0, ChangeType::Added, "Older"));
        let source = document(vec![older, old]);

        let releases = Manipulator::new()
            .update(&source, unreleased(vec![change(2, ChangeType::Fixed, "New")]))
            .unwrap();

        let names: Vec<_> = releases.iter().map(Release::name).collect();
        assert_eq!(names, ["0.0.1", "0.1.0", "Unreleased"]);

        let sorted_releases = releases.sort();
        let sorted: Vec<_> = sorted_releases.iter().map(Release::name).collect();
        assert_eq!(sorted, ["Unreleased", "0.1.0", "0.0.1"]);
    }

    #[test]
    fn test_update_replaces_changed_release() {
        let source = document(vec![unreleased(vec![change(1, ChangeType::Added, "One")])]);
        let release = unreleased(vec![
            change(1, ChangeType::Added, "One"),
            change(2, ChangeType::Added, "Two"),
        ]);

        let releases = Manipulator::new().update(&source, release).unwrap();
        assert_eq!(releases.count(), 1);
        assert_eq!(releases.unreleased().unwrap().count(), 2);
    }

    #[test]
    fn test_update_is_idempotent() {
        let renderer = MarkdownRenderer::new();
        let release = unreleased(vec![
            change(1, ChangeType::Added, "One"),
            change(2, ChangeType::Security, "Two"),
        ]);

        let first = Manipulator::new()
            .update(&EmptySource, release.clone())
            .unwrap()
            .sort();
        let rendered = renderer.render_releases(&first);

        let second = Manipulator::new()
            .update(&MarkdownSource::new(rendered.clone()), release)
            .unwrap()
            .sort();

        assert_eq!(second, first);
        assert_eq!(renderer.render_releases(&second), rendered);
    }

    #[test]
    fn test_update_twice_renders_identical_bytes() {
        let renderer = MarkdownRenderer::new();
        let merged_on = |number: u64, d: u32| -> ChangeSource {
            PullRequest::new(number, "t", "bob", at(d, 0))
                .with_merged_at(at(d, 0))
                .into()
        };
        let three = merged_on(3, 7);
        let release = unreleased(vec![
            Changes::single(Change::new(merged_on(1, 9), ChangeType::Changed, "one")),
            Changes::single(Change::new(merged_on(2, 8), ChangeType::Added, "two")),
            Changes::new(vec![
                Change::new(three.clone(), ChangeType::Added, "three added"),
                Change::new(three, ChangeType::Changed, "three changed"),
            ])
            .unwrap(),
        ]);

        let mut published = Release::new("0.1.0", day(1));
        published.add(Changes::single(Change::new(
            merged_on(4, 1),
            ChangeType::Fixed,
            " spacing",
        )));
        published.add(Changes::single(Change::new(
            merged_on(5, 1),
            ChangeType::Changed,
            "",
        )));
        let source = document(vec![published]);

        let first = Manipulator::new()
            .update(&source, release.clone())
            .unwrap()
            .sort();
        let rendered = renderer.render_releases(&first);
        assert_eq!(first.get("0.1.0").unwrap().count(), 2);

        let second = Manipulator::new()
            .update(&MarkdownSource::new(rendered.clone()), release)
            .unwrap()
            .sort();
        assert_eq!(second.get("0.1.0").unwrap().count(), 2);
        assert_eq!(renderer.render_releases(&second), rendered);
    }

    #[test]
    fn test_update_keeps_existing_date_when_unchanged() {
        let source = document(vec![unreleased(vec![change(1, ChangeType::Added, "One")])]);
        let mut later = Release::unreleased(day(9));
        later.add(change(1, ChangeType::Added, "One"));

        let releases = Manipulator::new().update(&source, later).unwrap();
        assert_eq!(releases.unreleased().unwrap().day(), day(5));
    }

    #[test]
    fn test_release_without_unreleased() {
        let mut only = Release::new("0.1.0", day(1));
        only.add(change(1, ChangeType::Added, "Old"));
        let source = document(vec![only]);

        let err = Manipulator::new()
            .release(&source, "0.2.0", day(6))
            .unwrap_err();
        assert!(matches!(err, CoreError::NothingToRelease));
        assert_eq!(err.to_string(), "There is nothing to release");
    }

    #[test]
    fn test_release_existing_name() {
        let mut old = Release::new("0.1.0", day(1));
        old.add(change(1, ChangeType::Added, "Old"));
        let source = document(vec![
            unreleased(vec![change(2, ChangeType::Fixed, "New")]),
            old,
        ]);

        let err = Manipulator::new()
            .release(&source, "0.1.0", day(6))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Release 0.1.0 already exists and can't be released again"
        );
    }

    #[test]
    fn test_release_renames_in_place() {
        let mut old = Release::new("0.1.0", day(1));
        old.add(change(1, ChangeType::Added, "Old"));
        let pending = unreleased(vec![change(2, ChangeType::Fixed, "New")]);
        let source = document(vec![pending.clone(), old]);

        let releases = Manipulator::new()
            .release(&source, "0.2.0", day(6))
            .unwrap();

        let names: Vec<_> = releases.iter().map(Release::name).collect();
        assert_eq!(names, ["0.2.0", "0.1.0"]);
        let promoted = releases.get("0.2.0").unwrap();
        assert_eq!(promoted.day(), day(6));
        assert_eq!(*promoted, pending);
        assert!(releases.unreleased().is_none());
    }
}
