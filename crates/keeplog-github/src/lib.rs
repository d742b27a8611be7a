//! GitHub provider for keeplog.
//!
//! [`GithubProvider`] implements [`keeplog_git::Provider`] over the GitHub
//! REST v3 API with a blocking HTTP client. Listings are paginated
//! sequentially.

mod client;
mod dto;
mod error;

pub use client::{DEFAULT_API_URL, GithubProvider};
pub use error::{GithubError, GithubResult};
