//! Renderer trait.

use keeplog_change::{Release, Releases};

/// Renders releases to a document.
///
/// Releases are rendered in the order given; sort them first.
pub trait Renderer {
    /// Renders a single release section.
    fn render_release(&self, release: &Release) -> String;

    /// Renders a full document.
    fn render_releases(&self, releases: &Releases) -> String;
}
