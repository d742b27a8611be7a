//! Change categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ChangeError;

/// The category a change belongs to.
///
/// The declaration order is the order sections are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// New functionality.
    Added,
    /// Changes in existing functionality.
    Changed,
    /// Bug fixes.
    Fixed,
    /// Removed functionality.
    Removed,
    /// Soon-to-be removed functionality.
    Deprecated,
    /// Vulnerability fixes.
    Security,
}

impl ChangeType {
    /// All change types, in rendering order.
    pub const ALL: [Self; 6] = [
        Self::Added,
        Self::Changed,
        Self::Fixed,
        Self::Removed,
        Self::Deprecated,
        Self::Security,
    ];

    /// Returns the lowercase identifier (e.g. `added`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Fixed => "fixed",
            Self::Removed => "removed",
            Self::Deprecated => "deprecated",
            Self::Security => "security",
        }
    }

    /// Returns the section label (e.g. `Added`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Fixed => "Fixed",
            Self::Removed => "Removed",
            Self::Deprecated => "Deprecated",
            Self::Security => "Security",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChangeType {
    type Err = ChangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ChangeError::UnknownChangeType(name.to_string()))
    }
}
