//! Changelog generation pipeline.

use chrono::{DateTime, Utc};
use keeplog_change::{Commit, Release};
use keeplog_detect::{Detector, DetectorChain};
use keeplog_git::Provider;
use tracing::info;

use crate::{
    Analyzer, Clock, CoreError, CoreResult, History, Scope, ScopeInputs, ScopeResolver,
    SystemClock, TransformOptions, Transformer,
};

/// What to generate.
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Scope inputs.
    pub scope: ScopeInputs,
    /// Source selection.
    pub sources: TransformOptions,
    /// Drop commits authored before this instant.
    pub since: Option<DateTime<Utc>>,
    /// Drop commits authored after this instant.
    pub until: Option<DateTime<Utc>>,
}

/// The outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The analyzed release.
    pub release: Release,
    /// The scope it was built from.
    pub scope: Scope,
}

/// Runs scope resolution, history fetch, transformation and analysis in
/// sequence.
pub struct Pipeline {
    provider: Box<dyn Provider>,
    detector: Box<dyn Detector>,
    clock: Box<dyn Clock>,
}

impl Pipeline {
    /// Creates a pipeline with the default detector chain and system clock.
    #[must_use]
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            detector: Box::new(DetectorChain::new()),
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the provider.
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Returns the clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage; nothing is produced on failure.
    pub fn run(&self, request: &PipelineRequest) -> CoreResult<Analysis> {
        self.run_with_progress(request, &mut |_| {})
    }

    /// Runs the pipeline, reporting each processed commit to `progress`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage; nothing is produced on failure.
    pub fn run_with_progress(
        &self,
        request: &PipelineRequest,
        progress: &mut dyn FnMut(&Commit),
    ) -> CoreResult<Analysis> {
        let scope = ScopeResolver::new(self.provider()).resolve(&request.scope)?;
        let range = scope
            .range(request.since, request.until)
            .ok_or(CoreError::IncompleteScope)?;

        let history = History::new(self.provider(), range);
        let sources = Transformer::new(&request.sources).transform(&history, progress)?;
        info!(count = sources.len(), "selected change sources");

        let release = Analyzer::new(self.detector.as_ref(), self.clock()).analyze(&scope, &sources)?;
        Ok(Analysis { release, scope })
    }
}
