//! Markdown changelogs.

use std::fmt::Write;

use chrono::NaiveDate;
use keeplog_change::{ChangeType, Release, Releases};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::entry::{
    DocumentBuilder, Token, TokenBuffer, collapse_whitespace, release_heading, source_label,
};
use crate::{ChangelogSource, FormatResult, Renderer};

/// Document title written above the releases.
const TITLE: &str = "# Changelog";

/// An empty description between its emphasis markers. Markdown reads it as
/// plain text.
const EMPTY_STRONG: &str = "****";

/// Reads a Markdown changelog.
#[derive(Debug, Clone)]
pub struct MarkdownSource {
    text: String,
    undated_day: Option<NaiveDate>,
}

impl MarkdownSource {
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

/// Turns the first literal [`EMPTY_STRONG`] of an item without emphasis
/// back into an empty strong token.
fn restore_empty_strong(mut tokens: Vec<Token>) -> Vec<Token> {
    if tokens.iter().any(|token| matches!(token, Token::Strong(_))) {
        return tokens;
    }

    let found = tokens.iter().enumerate().find_map(|(index, token)| match token {
        Token::Text(text) => {
            let at = text.find(EMPTY_STRONG)?;
            let before = text[..at].to_string();
            let after = text[at + EMPTY_STRONG.len()..].to_string();
            Some((index, before, after))
        }
        _ => None,
    });
    if let Some((index, before, after)) = found {
        let rest = tokens.split_off(index + 1);
        tokens.truncate(index);
        tokens.extend([Token::Text(before), Token::Strong(String::new()), Token::Text(after)]);
        tokens.extend(rest);
    }
    tokens
}

impl ChangelogSource for MarkdownSource {
    fn releases(&self) -> FormatResult<Releases> {
        let mut document = DocumentBuilder::new(self.undated_day);
        let mut heading: Option<(HeadingLevel, String)> = None;
        let mut item: Option<TokenBuffer> = None;
        let mut item_depth = 0usize;

        for event in Parser::new(&self.text) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => match heading.take() {
                    Some((HeadingLevel::H2, text)) => document.release_heading(&text),
                    Some((HeadingLevel::H3, text)) => document.type_heading(&text),
                    _ => {}
                },
                Event::Start(Tag::Item) => {
                    item_depth += 1;
                    if item_depth == 1 {
                        item = Some(TokenBuffer::default());
                    }
                }
                Event::End(TagEnd::Item) => {
                    if item_depth == 1
                        && let Some(buffer) = item.take()
                    {
                        document.item(&restore_empty_strong(buffer.finish()));
                    }
                    item_depth = item_depth.saturating_sub(1);
                }
                Event::Start(Tag::Strong) => {
                    if let Some(buffer) = item.as_mut().filter(|_| item_depth == 1) {
                        buffer.start_strong();
                    }
                }
                Event::End(TagEnd::Strong) => {
                    if let Some(buffer) = item.as_mut().filter(|_| item_depth == 1) {
                        buffer.end_strong();
                    }
                }
                Event::Start(Tag::Link { dest_url, .. }) => {
                    if let Some(buffer) = item.as_mut().filter(|_| item_depth == 1) {
                        buffer.start_link(&dest_url);
                    }
                }
                Event::End(TagEnd::Link) => {
                    if let Some(buffer) = item.as_mut().filter(|_| item_depth == 1) {
                        buffer.end_link();
                    }
                }
                Event::Text(text) | Event::InlineHtml(text) => {
                    push_text(&mut heading, &mut item, item_depth, &text);
                }
                Event::Code(code) => {
                    push_text(&mut heading, &mut item, item_depth, &format!("`{code}`"));
                }
                Event::SoftBreak | Event::HardBreak => {
                    push_text(&mut heading, &mut item, item_depth, " ");
                }
                _ => {}
            }
        }

        Ok(document.finish())
    }
}

fn push_text(
    heading: &mut Option<(HeadingLevel, String)>,
    item: &mut Option<TokenBuffer>,
    item_depth: usize,
    text: &str,
) {
    if let Some((_, heading)) = heading {
        heading.push_str(text);
    } else if let Some(buffer) = item.as_mut().filter(|_| item_depth == 1) {
        buffer.text(text);
    }
}

/// Escapes characters that Markdown would otherwise interpret.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '&') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Renders releases as Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for MarkdownRenderer {
    fn render_release(&self, release: &Release) -> String {
        let mut output = String::new();
        _ = writeln!(output, "## {}", release_heading(release));

        for change_type in ChangeType::ALL {
            let changes = release.of_type(change_type);
            if changes.is_empty() {
                continue;
            }

            _ = writeln!(output, "\n### {}\n", change_type.label());
            for change in changes {
                let source = change.source();
                let label = escape(&source_label(source));
                let origin = if source.url().is_empty() {
                    label
                } else {
                    format!("[{label}]({})", source.url())
                };

                let description = collapse_whitespace(change.description());
                _ = write!(output, "- {origin} - **{}**", escape(&description));

                if !source.author().is_empty() {
                    let handle = escape(&format!("@{}", source.author()));
                    if source.author_url().is_empty() {
                        _ = write!(output, " - {handle}");
                    } else {
                        _ = write!(output, " - [{handle}]({})", source.author_url());
                    }
                }
                output.push('\n');
            }
        }

        output
    }

    fn render_releases(&self, releases: &Releases) -> String {
        let mut output = String::new();
        _ = writeln!(output, "{TITLE}");
        for release in releases {
            output.push('\n');
            output.push_str(&self.render_release(release));
        }
        output
    }
}
