//! Changelog documents for keeplog.
//!
//! This crate reads existing changelog files back into
//! [`Releases`](keeplog_change::Releases) and renders releases to text:
//! - [`ChangelogSource`]: parses a document ([`MarkdownSource`],
//!   [`HtmlSource`], [`EmptySource`])
//! - [`Renderer`]: renders releases ([`MarkdownRenderer`], [`HtmlRenderer`])
//! - [`Format`]: picks the matching pair for a file
//!
//! Parsers accept what the renderers emit, so rendering and parsing a
//! document yields equal releases.

mod entry;
mod error;
mod format;
mod html;
mod markdown;
mod renderer;
mod source;

pub use error::{FormatError, FormatResult};
pub use format::{Format, source_for};
pub use html::{HtmlRenderer, HtmlSource};
pub use markdown::{MarkdownRenderer, MarkdownSource};
pub use renderer::Renderer;
pub use source::{ChangelogSource, EmptySource};
