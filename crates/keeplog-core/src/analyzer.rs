//! Release assembly.

use keeplog_change::{ChangeSource, Release, UNRELEASED};
use keeplog_detect::Detector;
use tracing::{debug, info};

use crate::{Clock, CoreResult, Scope};

/// Classifies change sources into a release.
pub struct Analyzer<'a> {
    detector: &'a dyn Detector,
    clock: &'a dyn Clock,
}

impl<'a> Analyzer<'a> {
    /// Creates an analyzer.
    #[must_use]
    pub fn new(detector: &'a dyn Detector, clock: &'a dyn Clock) -> Self {
        Self { detector, clock }
    }

    /// Builds the release of `scope` from `sources`.
    ///
    /// The release is named after the scope tag, or "Unreleased". It is
    /// dated by the start commit, or by the clock when there is none. A
    /// source seen twice only counts once.
    ///
    /// # Errors
    ///
    /// Returns an error if a detector fails.
    pub fn analyze(&self, scope: &Scope, sources: &[ChangeSource]) -> CoreResult<Release> {
        let name = scope.tag_name().unwrap_or(UNRELEASED);
        let day = scope
            .commit_start
            .as_ref()
            .map_or_else(|| self.clock.today(), |commit| commit.date.date_naive());

        let mut release = Release::new(name, day);
        for source in sources {
            if release.has_source(&source.id()) {
                debug!(source = %source, "duplicate source, keeping the first");
                continue;
            }
            release.add(self.detector.detect(source)?);
        }

        info!(release = name, %day, count = release.count(), "analyzed release");
        Ok(release)
    }
}
