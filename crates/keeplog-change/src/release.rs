//! A single named release.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Change, ChangeType, Changes};

/// Name of the release that collects changes not yet tagged.
pub const UNRELEASED: &str = "Unreleased";

/// A named, dated bucket of changes keyed by source.
///
/// Equality compares only the set of `(source id, type, description)`
/// tuples: the name, the day and the insertion order are ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Release {
    name: String,
    day: NaiveDate,
    changes: IndexMap<String, Changes>,
}

impl Release {
    /// Creates an empty release.
    #[must_use]
    pub fn new(name: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            name: name.into(),
            day,
            changes: IndexMap::new(),
        }
    }

    /// Creates an empty "Unreleased" release.
    #[must_use]
    pub fn unreleased(day: NaiveDate) -> Self {
        Self::new(UNRELEASED, day)
    }

    /// Returns the release name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the release day.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns true if this is the "Unreleased" release.
    #[must_use]
    pub fn is_unreleased(&self) -> bool {
        self.name.eq_ignore_ascii_case(UNRELEASED)
    }

    /// Adds changes for a source.
    ///
    /// The first changes added for a source win: adding another
    /// collection for a source already present is a no-op and returns
    /// `false`.
    pub fn add(&mut self, changes: Changes) -> bool {
        let id = changes.source().id();
        if self.changes.contains_key(&id) {
            return false;
        }
        self.changes.insert(id, changes);
        true
    }

    /// Returns true if changes for the given source id are present.
    #[must_use]
    pub fn has_source(&self, id: &str) -> bool {
        self.changes.contains_key(id)
    }

    /// Returns the changes ordered by source date, newest first.
    ///
    /// Sources with the same date keep their insertion order.
    #[must_use]
    pub fn changes(&self) -> Vec<&Changes> {
        let mut changes: Vec<&Changes> = self.changes.values().collect();
        changes.sort_by(|a, b| b.source().date().cmp(&a.source().date()));
        changes
    }

    /// Returns every change, following [`Release::changes`] order.
    #[must_use]
    pub fn all(&self) -> Vec<&Change> {
        self.changes().into_iter().flat_map(Changes::iter).collect()
    }

    /// Returns the changes of the given type.
    #[must_use]
    pub fn of_type(&self, change_type: ChangeType) -> Vec<&Change> {
        self.all()
            .into_iter()
            .filter(|change| change.change_type() == change_type)
            .collect()
    }

    /// Returns the added changes.
    #[must_use]
    pub fn added(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Added)
    }

    /// Returns the changed changes.
    #[must_use]
    pub fn changed(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Changed)
    }

    /// Returns the fixed changes.
    #[must_use]
    pub fn fixed(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Fixed)
    }

    /// Returns the removed changes.
    #[must_use]
    pub fn removed(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Removed)
    }

    /// Returns the deprecated changes.
    #[must_use]
    pub fn deprecated(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Deprecated)
    }

    /// Returns the security changes.
    #[must_use]
    pub fn security(&self) -> Vec<&Change> {
        self.of_type(ChangeType::Security)
    }

    /// Returns the number of individual changes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.changes.values().map(Changes::count).sum()
    }

    /// Returns true if no changes were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns a copy under a new name and day, with the same changes.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            name: name.into(),
            day,
            changes: self.changes.clone(),
        }
    }

    fn fingerprint(&self) -> BTreeSet<(String, ChangeType, &str)> {
        self.changes
            .values()
            .flat_map(Changes::iter)
            .map(|change| {
                (
                    change.source().id(),
                    change.change_type(),
                    change.description(),
                )
            })
            .collect()
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Release {}
