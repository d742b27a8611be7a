//! The changelog document model.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{ChangeError, ChangeResult, Release, parse_release_version};

/// An ordered collection of releases, unique by case-insensitive name.
///
/// Mutators never modify `self`; they return a new collection.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Releases {
    releases: Vec<Release>,
}

impl Releases {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection from releases in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if two releases share a name.
    pub fn from_releases(releases: impl IntoIterator<Item = Release>) -> ChangeResult<Self> {
        let mut collected: Vec<Release> = Vec::new();
        for release in releases {
            if collected
                .iter()
                .any(|existing| same_name(existing.name(), release.name()))
            {
                return Err(ChangeError::ReleaseExists(release.name().to_string()));
            }
            collected.push(release);
        }
        Ok(Self {
            releases: collected,
        })
    }

    /// Returns the number of releases.
    #[must_use]
    pub fn count(&self) -> usize {
        self.releases.len()
    }

    /// Returns true if there are no releases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Returns all releases in their current order.
    #[must_use]
    pub fn all(&self) -> &[Release] {
        &self.releases
    }

    /// Returns an iterator over the releases.
    pub fn iter(&self) -> std::slice::Iter<'_, Release> {
        self.releases.iter()
    }

    /// Returns true if a release with the given name exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the release with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Release> {
        self.position(name).map(|index| &self.releases[index])
    }

    /// Returns the "Unreleased" release, if present.
    #[must_use]
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.iter().find(|release| release.is_unreleased())
    }

    /// Returns a collection with `release` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if a release with the same name exists.
    pub fn add(&self, release: Release) -> ChangeResult<Self> {
        if self.has(release.name()) {
            return Err(ChangeError::ReleaseExists(release.name().to_string()));
        }
        let mut releases = self.releases.clone();
        releases.push(release);
        Ok(Self { releases })
    }

    /// Returns a collection with the same-named release swapped for `release`,
    /// keeping its position.
    ///
    /// # Errors
    ///
    /// Returns an error if no release with that name exists.
    pub fn replace(&self, release: Release) -> ChangeResult<Self> {
        let index = self
            .position(release.name())
            .ok_or_else(|| ChangeError::ReleaseNotFound(release.name().to_string()))?;
        let mut releases = self.releases.clone();
        releases[index] = release;
        Ok(Self { releases })
    }

    /// Like [`Releases::replace`], but keeps the existing release when its
    /// changes equal those of `release`.
    ///
    /// # Errors
    ///
    /// Returns an error if no release with that name exists.
    pub fn update(&self, release: Release) -> ChangeResult<Self> {
        match self.get(release.name()) {
            None => Err(ChangeError::ReleaseNotFound(release.name().to_string())),
            Some(existing) if *existing == release => Ok(self.clone()),
            Some(_) => self.replace(release),
        }
    }

    /// Returns a collection without the named release.
    #[must_use]
    pub fn remove(&self, name: &str) -> Self {
        Self {
            releases: self
                .releases
                .iter()
                .filter(|release| !same_name(release.name(), name))
                .cloned()
                .collect(),
        }
    }

    /// Returns a sorted collection.
    ///
    /// "Unreleased" comes first, then semantic versions in descending order
    /// (ties broken by day, newest first). Names that are not semantic
    /// versions come last and keep their current relative order.
    #[must_use]
    pub fn sort(&self) -> Self {
        let mut releases = self.releases.clone();
        releases.sort_by(compare_releases);
        Self { releases }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.releases
            .iter()
            .position(|release| same_name(release.name(), name))
    }
}

impl PartialEq for Releases {
    fn eq(&self, other: &Self) -> bool {
        self.releases.len() == other.releases.len()
            && self
                .releases
                .iter()
                .zip(&other.releases)
                .all(|(a, b)| same_name(a.name(), b.name()) && a == b)
    }
}

impl Eq for Releases {}

impl<'a> IntoIterator for &'a Releases {
    type Item = &'a Release;
    type IntoIter = std::slice::Iter<'a, Release>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn compare_releases(a: &Release, b: &Release) -> Ordering {
    match (a.is_unreleased(), b.is_unreleased()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match (
        parse_release_version(a.name()),
        parse_release_version(b.name()),
    ) {
        (Some(left), Some(right)) => right.cmp(&left).then_with(|| b.day().cmp(&a.day())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
