//! Detector trait.

use keeplog_change::{ChangeSource, Changes};

use crate::DetectResult;

/// Classifies the free text of a change source.
pub trait Detector: Send + Sync {
    /// Returns the detector name.
    fn name(&self) -> &'static str;

    /// Returns whether this detector understands the given source.
    ///
    /// This check must be cheap and must agree with [`Detector::detect`].
    fn supports(&self, source: &ChangeSource) -> bool;

    /// Extracts the changes of a supported source.
    ///
    /// # Errors
    ///
    /// Returns an error when called on a source that [`Detector::supports`]
    /// rejects. Callers are expected to check support first.
    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes>;
}
