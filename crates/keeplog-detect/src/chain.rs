//! Ordered detector evaluation.

use keeplog_change::{ChangeSource, Changes};
use tracing::debug;

use crate::{
    ConventionalDetector, DefaultDetector, DetectResult, Detector, HtmlDetector, PrefixDetector,
};

/// Evaluates detectors in order and uses the first one that supports a
/// source. A [`DefaultDetector`] is always consulted last, so detection of
/// any source yields at least one change.
pub struct DetectorChain {
    detectors: Vec<Box<dyn Detector>>,
    fallback: DefaultDetector,
}

impl DetectorChain {
    /// Creates a chain with no detectors besides the fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
            fallback: DefaultDetector::new(),
        }
    }

    /// Creates the standard chain: HTML, conventional, prefix, default.
    #[must_use]
    pub fn new() -> Self {
        Self::empty()
            .with_detector(Box::new(HtmlDetector::new()))
            .with_detector(Box::new(ConventionalDetector::new()))
            .with_detector(Box::new(PrefixDetector::new()))
    }

    /// Appends a detector, evaluated after those already present.
    #[must_use]
    pub fn with_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Returns the names of the detectors in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors
            .iter()
            .map(|detector| detector.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Returns the detector that will handle `source`.
    pub fn select(&self, source: &ChangeSource) -> &dyn Detector {
        self.detectors
            .iter()
            .find(|detector| detector.supports(source))
            .map_or(&self.fallback as &dyn Detector, |detector| &**detector)
    }

    /// Detects the changes of `source` with the first supporting detector.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected detector fails after reporting
    /// support, which the built-in detectors never do.
    pub fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        let detector = self.select(source);
        debug!(source = %source, detector = detector.name(), "detecting changes");
        detector.detect(source)
    }
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DetectorChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn supports(&self, _source: &ChangeSource) -> bool {
        true
    }

    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        DetectorChain::detect(self, source)
    }
}
