//! HTML changelogs.

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::NaiveDate;
use keeplog_change::{ChangeType, Release, Releases};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::entry::{
    DocumentBuilder, TokenBuffer, collapse_whitespace, release_heading, source_label,
};
use crate::{ChangelogSource, FormatError, FormatResult, Renderer};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z!/][^>]*>").expect("invalid regex"));

static STRUCTURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, li").expect("invalid selector"));

/// Reads an HTML changelog.
#[derive(Debug, Clone)]
pub struct HtmlSource {
    text: String,
    undated_day: Option<NaiveDate>,
}

impl HtmlSource {
    /// Creates a source over the document text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            undated_day: None,
        }
    }

    /// Reads an undated "Unreleased" heading as a release on `day`.
    #[must_use]
    pub fn with_undated_day(mut self, day: NaiveDate) -> Self {
        self.undated_day = Some(day);
        self
    }
}

fn item_tokens(item: ElementRef<'_>) -> TokenBuffer {
    let mut buffer = TokenBuffer::default();

    for child in item.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let text = collapse_whitespace(&element.text().collect::<String>());
            match element.value().name() {
                "a" => {
                    buffer.start_link(element.value().attr("href").unwrap_or(""));
                    buffer.text(&text);
                    buffer.end_link();
                }
                "strong" | "b" => {
                    buffer.start_strong();
                    buffer.text(&text);
                    buffer.end_strong();
                }
                "ul" | "ol" => {}
                _ => buffer.text(&text),
            }
        } else if let Some(text) = child.value().as_text() {
            buffer.text(text);
        }
    }

    buffer
}

impl ChangelogSource for HtmlSource {
    fn releases(&self) -> FormatResult<Releases> {
        if self.text.trim().is_empty() {
            return Ok(Releases::new());
        }
        if !TAG_RE.is_match(&self.text) {
            return Err(FormatError::Malformed {
                format: "HTML",
                reason: "the document contains no tags".to_string(),
            });
        }

        let html = Html::parse_document(&self.text);
        let mut document = DocumentBuilder::new(self.undated_day);

        for element in html.select(&STRUCTURE_SELECTOR) {
            let heading = || collapse_whitespace(&element.text().collect::<String>());
            match element.value().name() {
                "h2" => document.release_heading(&heading()),
                "h3" => document.type_heading(&heading()),
                _ => document.item(&item_tokens(element).finish()),
            }
        }

        Ok(document.finish())
    }
}

/// Escapes text for element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders releases as HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HtmlRenderer {
    fn render_release(&self, release: &Release) -> String {
        let mut output = String::new();
        _ = writeln!(output, "<h2>{}</h2>", escape(&release_heading(release)));

        for change_type in ChangeType::ALL {
            let changes = release.of_type(change_type);
            if changes.is_empty() {
                continue;
            }

            _ = writeln!(output, "<h3>{}</h3>", change_type.label());
            output.push_str("<ul>\n");
            for change in changes {
                let source = change.source();
                let label = escape(&source_label(source));
                let origin = if source.url().is_empty() {
                    label
                } else {
                    format!("<a href=\"{}\">{label}</a>", escape(source.url()))
                };

                _ = write!(
                    output,
                    "<li>{origin} - <strong>{}</strong>",
                    escape(&collapse_whitespace(change.description()))
                );

                if !source.author().is_empty() {
                    let handle = escape(&format!("@{}", source.author()));
                    if source.author_url().is_empty() {
                        _ = write!(output, " - {handle}");
                    } else {
                        _ = write!(
                            output,
                            " - <a href=\"{}\">{handle}</a>",
                            escape(source.author_url())
                        );
                    }
                }
                output.push_str("</li>\n");
            }
            output.push_str("</ul>\n");
        }

        output
    }

    fn render_releases(&self, releases: &Releases) -> String {
        let mut output = String::from("<h1>Changelog</h1>\n");
        for release in releases {
            output.push_str(&self.render_release(release));
        }
        output
    }
}
