//! Conventional Commits detector.

use std::sync::LazyLock;

use keeplog_change::{Change, ChangeSource, ChangeType, Changes};
use regex::Regex;

use crate::{DetectError, DetectResult, Detector};

static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?: (?P<message>.+)$")
        .expect("invalid regex")
});

/// Type tokens understood by the detector.
const TYPE_TOKENS: &[(&str, ChangeType)] = &[
    ("add", ChangeType::Added),
    ("added", ChangeType::Added),
    ("feat", ChangeType::Added),
    ("change", ChangeType::Changed),
    ("changed", ChangeType::Changed),
    ("updated", ChangeType::Changed),
    ("fix", ChangeType::Fixed),
    ("fixed", ChangeType::Fixed),
    ("cs", ChangeType::Fixed),
    ("remove", ChangeType::Removed),
    ("removed", ChangeType::Removed),
    ("rm", ChangeType::Removed),
    ("dep", ChangeType::Deprecated),
    ("deprecated", ChangeType::Deprecated),
    ("deprecate", ChangeType::Deprecated),
    ("sec", ChangeType::Security),
    ("security", ChangeType::Security),
];

/// Detects `<type>(<scope>)!: <description>` headers.
///
/// Only the first line of the description is considered. Type tokens are
/// matched case-insensitively against a fixed allow-list.
pub struct ConventionalDetector;

impl ConventionalDetector {
    /// Creates a new conventional detector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a type token to its change type.
    fn change_type(token: &str) -> Option<ChangeType> {
        TYPE_TOKENS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, kind)| *kind)
    }

    fn header(source: &ChangeSource) -> &str {
        source.description().lines().next().unwrap_or("").trim()
    }
}

impl Default for ConventionalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ConventionalDetector {
    fn name(&self) -> &'static str {
        "conventional"
    }

    fn supports(&self, source: &ChangeSource) -> bool {
        CONVENTIONAL_RE
            .captures(Self::header(source))
            .and_then(|captures| captures.name("type"))
            .is_some_and(|token| Self::change_type(token.as_str()).is_some())
    }

    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        let header = Self::header(source);
        let captures = CONVENTIONAL_RE
            .captures(header)
            .ok_or_else(|| DetectError::NotConventional(source.to_string()))?;

        let token = captures.name("type").map_or("", |m| m.as_str());
        let kind = Self::change_type(token).ok_or_else(|| DetectError::UnknownType {
            token: token.to_string(),
            subject: source.to_string(),
        })?;
        let message = captures.name("message").map_or("", |m| m.as_str()).trim();

        Ok(Changes::single(Change::new(source.clone(), kind, message)))
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
        let changes = ConventionalDetector::new().detect(&commit(message)).unwrap();
        let change = &changes.all()[0];
        (change.change_type(), change.description().to_string())
    }

    #[test]
    fn test_simple_commit() {
        assert_eq!(detect("fix: bug"), (ChangeType::Fixed, "bug".to_string()));
    }

    #[test]
    fn test_with_scope_and_breaking() {
        assert_eq!(
            detect("feat(api)!: redesign endpoints"),
            (ChangeType::Added, "redesign endpoints".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_token() {
        assert_eq!(
            detect("Security: patch XSS"),
            (ChangeType::Security, "patch XSS".to_string())
        );
    }

    #[test]
    fn test_all_tokens_map() {
        for (token, kind) in TYPE_TOKENS {
            let message = format!("{token}: something");
            assert!(ConventionalDetector::new().supports(&commit(&message)));
            assert_eq!(detect(&message).0, *kind);
        }
    }

    #[test]
    fn test_only_header_is_used() {
        assert_eq!(
            detect("rm: legacy parser\n\nfix: not this one"),
            (ChangeType::Removed, "legacy parser".to_string())
        );
    }

    #[test]
    fn test_unknown_token_not_supported() {
        let detector = ConventionalDetector::new();
        assert!(!detector.supports(&commit("docs: update readme")));
        assert!(!detector.supports(&commit("chore(deps): bump regex")));
    }

    #[test]
    fn test_not_conventional() {
        let detector = ConventionalDetector::new();
        assert!(!detector.supports(&commit("added new feature")));
        assert!(!detector.supports(&commit("fix:missing space")));
        assert!(!detector.supports(&commit("")));
    }

    #[test]
    fn test_detect_unknown_token_fails() {
        let result = ConventionalDetector::new().detect(&commit("docs: readme"));
        assert!(matches!(result, Err(DetectError::UnknownType { token, .. }) if token == "docs"));
    }

    #[test]
    fn test_detect_not_conventional_fails() {
        let result = ConventionalDetector::new().detect(&commit("plain message"));
        assert!(matches!(result, Err(DetectError::NotConventional(_))));
    }

    #[test]
    fn test_pull_request_uses_body() {
        let pr: ChangeSource = PullRequest::new(3, "Some title", "bob", Utc::now())
            .with_body("deprecated: old calendar")
            .into();
        let changes = ConventionalDetector::new().detect(&pr).unwrap();
        assert_eq!(changes.all()[0].change_type(), ChangeType::Deprecated);
        assert_eq!(changes.all()[0].description(), "old calendar");
    }
}
