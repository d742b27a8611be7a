//! Format selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    ChangelogSource, EmptySource, FormatError, HtmlRenderer, HtmlSource, MarkdownRenderer,
    MarkdownSource, Renderer,
};

/// A changelog document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Markdown.
    #[default]
    #[serde(alias = "md")]
    Markdown,
    /// HTML.
    #[serde(alias = "htm")]
    Html,
}

impl Format {
    /// Infers the format from a file extension: `.html` and `.htm` are HTML,
    /// anything else is Markdown.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("html" | "htm") => Self::Html,
            _ => Self::Markdown,
        }
    }

    /// Returns the renderer for this format.
    #[must_use]
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Markdown => Box::new(MarkdownRenderer::new()),
            Self::Html => Box::new(HtmlRenderer::new()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Builds the source for an existing document, or an empty source when
/// there is no document yet.
///
/// An "Unreleased" heading written without a day is read as a release on
/// `undated_day`.
#[must_use]
pub fn source_for(
    format: Format,
    text: Option<String>,
    undated_day: NaiveDate,
) -> Box<dyn ChangelogSource> {
    match (format, text) {
        (_, None) => Box::new(EmptySource),
        (Format::Markdown, Some(text)) => {
            Box::new(MarkdownSource::new(text).with_undated_day(undated_day))
        }
        (Format::Html, Some(text)) => Box::new(HtmlSource::new(text).with_undated_day(undated_day)),
    }
}
