//! Leading-verb detector.

use keeplog_change::{Change, ChangeSource, ChangeType, Changes};

use crate::{DetectError, DetectResult, Detector};

/// Known leading verbs, checked in order. Each must be followed by a space.
const PREFIXES: &[(ChangeType, &[&str])] = &[
    (ChangeType::Added, &["add", "added", "adding"]),
    (
        ChangeType::Changed,
        &["change", "changed", "updated", "replaced", "bump"],
    ),
    (ChangeType::Fixed, &["fix", "fixed", "fixing"]),
    (
        ChangeType::Removed,
        &["rm", "removed", "rem", "drop", "dropped"],
    ),
    (ChangeType::Deprecated, &["deprecated", "dep"]),
    (ChangeType::Security, &["security", "sec"]),
];

/// Detects a well-known verb at the start of the source title.
///
/// `"added new feature"` becomes an [`ChangeType::Added`] change described
/// as `"new feature"`.
pub struct PrefixDetector;

impl PrefixDetector {
    /// Creates a new prefix detector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Finds the first matching prefix, returning its type and the rest of
    /// the title after the separating space.
    fn matching(title: &str) -> Option<(ChangeType, &str)> {
        PREFIXES.iter().find_map(|(kind, prefixes)| {
            prefixes.iter().find_map(|prefix| {
                let head = title.get(..prefix.len())?;
                let rest = title.get(prefix.len()..)?;
                if head.eq_ignore_ascii_case(prefix) {
                    rest.strip_prefix(' ').map(|rest| (*kind, rest))
                } else {
                    None
                }
            })
        })
    }
}

impl Default for PrefixDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PrefixDetector {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn supports(&self, source: &ChangeSource) -> bool {
        Self::matching(source.title()).is_some()
    }

    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        let (kind, rest) = Self::matching(source.title())
            .ok_or_else(|| DetectError::NoPrefix(source.to_string()))?;
        Ok(Changes::single(Change::new(source.clone(), kind, rest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use keeplog_change::{Commit, PullRequest};

    fn commit(message: &str) -> ChangeSource {
        Commit::new("abc123", message, "alice", Utc::now()).into()
    }

    fn detect(message: &str) -> (ChangeType, String) {
        let changes = PrefixDetector::new().detect(&commit(message)).unwrap();
        let change = &changes.all()[0];
        (change.change_type(), change.description().to_string())
    }

    #[test]
    fn test_added_prefix() {
        assert_eq!(
            detect("added new feature"),
            (ChangeType::Added, "new feature".to_string())
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            detect("Fixed crash on startup"),
            (ChangeType::Fixed, "crash on startup".to_string())
        );
        assert_eq!(
            detect("BUMP regex to 1.11"),
            (ChangeType::Changed, "regex to 1.11".to_string())
        );
    }

    #[test]
    fn test_every_type_reachable() {
        assert_eq!(detect("add x").0, ChangeType::Added);
        assert_eq!(detect("replaced x").0, ChangeType::Changed);
        assert_eq!(detect("fixing x").0, ChangeType::Fixed);
        assert_eq!(detect("dropped x").0, ChangeType::Removed);
        assert_eq!(detect("dep x").0, ChangeType::Deprecated);
        assert_eq!(detect("sec x").0, ChangeType::Security);
    }

    #[test]
    fn test_longer_prefix_wins_when_shorter_lacks_space() {
        // "add" does not match "adding x" because no space follows it
        assert_eq!(detect("adding x"), (ChangeType::Added, "x".to_string()));
    }

    #[test]
    fn test_only_first_line() {
        assert_eq!(
            detect("removed old flag\n\nadd more"),
            (ChangeType::Removed, "old flag".to_string())
        );
    }

    #[test]
    fn test_rest_is_not_trimmed() {
        assert_eq!(detect("fix  spacing").1, " spacing");
    }

    #[test]
    fn test_requires_space() {
        let detector = PrefixDetector::new();
        assert!(!detector.supports(&commit("addition of things")));
        assert!(!detector.supports(&commit("fixup")));
        assert!(!detector.supports(&commit("Update docs")));
        assert!(!detector.supports(&commit("")));
    }

    #[test]
    fn test_multibyte_title_does_not_panic() {
        assert!(!PrefixDetector::new().supports(&commit("été chaud")));
    }

    #[test]
    fn test_pull_request_uses_title() {
        let pr: ChangeSource = PullRequest::new(7, "Deprecated v1 API", "bob", Utc::now())
            .with_body("long explanation")
            .into();
        let changes = PrefixDetector::new().detect(&pr).unwrap();
        assert_eq!(changes.all()[0].change_type(), ChangeType::Deprecated);
        assert_eq!(changes.all()[0].description(), "v1 API");
    }

    #[test]
    fn test_detect_without_prefix_fails() {
        let result = PrefixDetector::new().detect(&commit("Update docs"));
        assert!(matches!(result, Err(DetectError::NoPrefix(_))));
    }
}
