//! Change model for keeplog.
//!
//! This crate provides the types every other keeplog crate speaks:
//! - [`ChangeSource`]: a commit or pull request that changes may be attributed to
//! - [`Change`] / [`Changes`]: classified changes grouped by source
//! - [`Release`] / [`Releases`]: the changelog document model

mod change;
mod error;
mod kind;
mod release;
mod releases;
mod source;
mod version;

pub use change::{Change, Changes};
pub use error::{ChangeError, ChangeResult};
pub use kind::ChangeType;
pub use release::{Release, UNRELEASED};
pub use releases::Releases;
pub use source::{ChangeSource, Commit, PullRequest, SourceKind};
pub use version::parse_release_version;
