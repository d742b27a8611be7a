//! Classified changes.

use serde::Serialize;

use crate::{ChangeError, ChangeResult, ChangeSource, ChangeType};

/// A single classified change attributed to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    source: ChangeSource,
    #[serde(rename = "type")]
    change_type: ChangeType,
    description: String,
}

impl Change {
    /// Creates a new change.
    #[must_use]
    pub fn new(
        source: ChangeSource,
        change_type: ChangeType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source,
            change_type,
            description: description.into(),
        }
    }

    /// Returns the source this change is attributed to.
    #[must_use]
    pub fn source(&self) -> &ChangeSource {
        &self.source
    }

    /// Returns the change type.
    #[must_use]
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A non-empty list of changes that all share one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Changes {
    changes: Vec<Change>,
}

impl Changes {
    /// Creates a collection from the given changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `changes` is empty or if the changes do not all
    /// share the same source (same kind and id).
    pub fn new(changes: Vec<Change>) -> ChangeResult<Self> {
        let Some(first) = changes.first() else {
            return Err(ChangeError::EmptyChanges);
        };

        if let Some(stranger) = changes
            .iter()
            .find(|change| !change.source.is_same_source(&first.source))
        {
            return Err(ChangeError::MixedSources {
                expected: first.source.to_string(),
                found: stranger.source.to_string(),
            });
        }

        Ok(Self { changes })
    }

    /// Creates a collection holding exactly one change.
    #[must_use]
    pub fn single(change: Change) -> Self {
        Self {
            changes: vec![change],
        }
    }

    /// Returns the shared source.
    #[must_use]
    pub fn source(&self) -> &ChangeSource {
        // non-empty by construction
        &self.changes[0].source
    }

    /// Returns all changes in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Change] {
        &self.changes
    }

    /// Returns the number of changes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.changes.len()
    }

    /// Returns the changes of the given type.
    #[must_use]
    pub fn of_type(&self, change_type: ChangeType) -> Vec<&Change> {
        self.changes
            .iter()
            .filter(|change| change.change_type == change_type)
            .collect()
    }

    /// Concatenates two collections over the same source.
    ///
    /// # Errors
    ///
    /// Returns an error if `other` belongs to a different source.
    pub fn merge(&self, other: &Self) -> ChangeResult<Self> {
        let mut changes = self.changes.clone();
        changes.extend(other.changes.iter().cloned());
        Self::new(changes)
    }

    /// Returns an iterator over the changes.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
