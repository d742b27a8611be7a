//! Core library for keeplog.
//!
//! This crate turns repository history into a [`Release`] and merges it into
//! an existing changelog:
//!
//! 1. [`ScopeResolver`] settles the commit range from tags, branches and SHAs
//! 2. [`History`] fetches the commits of that range
//! 3. [`Transformer`] picks a commit or pull request for each of them
//! 4. [`Analyzer`] classifies every source into a release
//! 5. [`Manipulator`] merges the release into the parsed document
//!
//! [`Pipeline`] runs steps 1 to 4 in sequence.
//!
//! [`Release`]: keeplog_change::Release

mod analyzer;
mod clock;
mod error;
mod history;
mod manipulator;
mod pipeline;
mod scope;
mod transformer;

#[cfg(test)]
mod testing;

pub use analyzer::Analyzer;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use history::History;
pub use manipulator::Manipulator;
pub use pipeline::{Analysis, Pipeline, PipelineRequest};
pub use scope::{Scope, ScopeInputs, ScopeResolver};
pub use transformer::{SourceMode, TransformOptions, Transformer};
