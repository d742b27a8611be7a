//! Repository access for keeplog.
//!
//! This crate provides:
//! - [`Provider`]: the operations keeplog needs from a hosting backend
//! - [`LocalRepository`]: a [`Provider`] over a local Git repository
//! - The reference types exchanged with providers ([`Tag`], [`Branch`],
//!   [`CommitRange`], [`FileContent`], [`Author`])

mod error;
mod provider;
mod repository;
mod types;

pub use error::{GitError, GitResult};
pub use provider::Provider;
pub use repository::LocalRepository;
pub use types::{Author, Branch, CommitRange, FileContent, Tag};
