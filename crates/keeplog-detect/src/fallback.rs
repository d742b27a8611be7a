//! Catch-all detector.

use keeplog_change::{Change, ChangeSource, ChangeType, Changes};

use crate::{DetectResult, Detector};

/// Accepts every source as a single "Changed" entry described by its title.
pub struct DefaultDetector;

impl DefaultDetector {
    /// Creates a new default detector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DefaultDetector {
    fn name(&self) -> &'static str {
        "default"
    }

    fn supports(&self, _source: &ChangeSource) -> bool {
        true
    }

    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        Ok(Changes::single(Change::new(
            source.clone(),
            ChangeType::Changed,
            source.title(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use keeplog_change::Commit;

    #[test]
    fn test_title_verbatim() {
        let source: ChangeSource = Commit::new("abc", "Update docs\n\nmore", "alice", Utc::now()).into();
        let changes = DefaultDetector::new().detect(&source).unwrap();

        assert_eq!(changes.count(), 1);
        assert_eq!(changes.all()[0].change_type(), ChangeType::Changed);
        assert_eq!(changes.all()[0].description(), "Update docs");
    }

    #[test]
    fn test_empty_message() {
        let source: ChangeSource = Commit::new("abc", "", "alice", Utc::now()).into();
        let detector = DefaultDetector::new();

        assert!(detector.supports(&source));
        assert_eq!(detector.detect(&source).unwrap().all()[0].description(), "");
    }
}
