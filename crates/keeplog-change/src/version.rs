//! Release name versioning.

use semver::Version;

/// Parses a release name as a semantic version.
///
/// A leading `v` or `V` is accepted (`v1.2.3`). Returns `None` for names
/// that are not semantic versions, such as "Unreleased".
#[must_use]
pub fn parse_release_version(name: &str) -> Option<Version> {
    let name = name.trim();
    let candidate = name.strip_prefix(&['v', 'V'][..]).unwrap_or(name);
    Version::parse(candidate).ok()
}
