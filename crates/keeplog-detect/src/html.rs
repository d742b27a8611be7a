//! Structured HTML block detector.
//!
//! Pull request templates can carry a block such as:
//!
//! ```html
//! <div id="change-log">
//!   <ul id="added"><li>New calendar API</li></ul>
//!   <ul id="fixed"><li>Leap year handling</li></ul>
//! </div>
//! ```
//!
//! Each list item becomes one change of the type named by its list id.

use std::sync::LazyLock;

use keeplog_change::{Change, ChangeSource, ChangeType, Changes};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{DetectError, DetectResult, Detector};

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("invalid regex"));

static BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#change-log").expect("invalid selector"));

static LIST_SELECTORS: LazyLock<Vec<(ChangeType, Selector)>> = LazyLock::new(|| {
    ChangeType::ALL
        .into_iter()
        .map(|kind| {
            let selector = Selector::parse(&format!("ul#{} > li", kind.as_str()))
                .expect("invalid selector");
            (kind, selector)
        })
        .collect()
});

/// Detects changes listed in an HTML `change-log` block.
///
/// A `change-log` block is only supported when it holds at least one
/// non-blank item. A block with nothing in it would yield an empty
/// [`Changes`], which cannot exist, so such sources fall through to the
/// next detector in the chain instead.
pub struct HtmlDetector;

impl HtmlDetector {
    /// Creates a new HTML detector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Collects `(type, text)` entries of the block, in type order.
    fn entries(block: ElementRef<'_>) -> Vec<(ChangeType, String)> {
        let mut entries = Vec::new();
        for (kind, selector) in LIST_SELECTORS.iter() {
            for item in block.select(selector) {
                let text = item
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    entries.push((*kind, text));
                }
            }
        }
        entries
    }
}

impl Default for HtmlDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for HtmlDetector {
    fn name(&self) -> &'static str {
        "html"
    }

    fn supports(&self, source: &ChangeSource) -> bool {
        let description = source.description();
        if !HTML_TAG_RE.is_match(description) {
            return false;
        }

        let document = Html::parse_fragment(description);
        document
            .select(&BLOCK_SELECTOR)
            .next()
            .is_some_and(|block| !Self::entries(block).is_empty())
    }

    fn detect(&self, source: &ChangeSource) -> DetectResult<Changes> {
        let document = Html::parse_fragment(source.description());
        let block = document
            .select(&BLOCK_SELECTOR)
            .next()
            .ok_or_else(|| DetectError::MissingBlock(source.to_string()))?;

        let changes = Self::entries(block)
            .into_iter()
            .map(|(kind, text)| Change::new(source.clone(), kind, text))
            .collect();

        Ok(Changes::new(changes)?)
    }
}
