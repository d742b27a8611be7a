//! Changelog source trait.

use keeplog_change::Releases;

use crate::FormatResult;

/// An existing changelog document that can be read back into releases.
///
/// Malformed release sections are skipped. An error is returned only when
/// the document cannot be read as its declared format at all.
pub trait ChangelogSource {
    /// Parses the document.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Malformed`](crate::FormatError::Malformed) when
    /// the text is not a document of this format.
    fn releases(&self) -> FormatResult<Releases>;
}

/// A source for a changelog that does not exist yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl ChangelogSource for EmptySource {
    fn releases(&self) -> FormatResult<Releases> {
        Ok(Releases::new())
    }
}
