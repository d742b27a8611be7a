//! Pieces shared by the Markdown and HTML formats.
//!
//! Both formats lay out a release the same way:
//!
//! ```text
//! [0.13.3] - 2021-01-04                  release heading
//! Changed                                type heading
//! [#87](url) - **text** - [@bob](url)    one item per change
//! ```
//!
//! The format modules flatten each list item into [`Token`]s and feed
//! headings and items to a [`DocumentBuilder`].

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use keeplog_change::{
    Change, ChangeSource, ChangeType, Changes, Commit, PullRequest, Release, Releases, UNRELEASED,
};
use regex::Regex;
use tracing::{debug, warn};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?(?P<name>[^\]\s]+)\]?(?:\s+-\s+(?P<day>\d{4}-\d{2}-\d{2}))?\s*$")
        .expect("invalid regex")
});

static PULL_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pull/(?P<number>\d+)").expect("invalid regex"));

static COMMIT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/commit/(?P<sha>[0-9a-fA-F]+)").expect("invalid regex"));

/// Date format of release headings.
pub(crate) const DAY_FORMAT: &str = "%Y-%m-%d";

/// Returns the label linking a change to its source.
///
/// Commits without a URL keep their full SHA so the id survives a round trip.
pub(crate) fn source_label(source: &ChangeSource) -> String {
    match source {
        ChangeSource::Commit(commit) if commit.url.is_empty() => commit.sha.clone(),
        _ => source.label(),
    }
}

/// Collapses every whitespace run to one space and trims the ends.
///
/// Descriptions are rendered in this form, since neither format keeps
/// leading, trailing or repeated whitespace inside emphasis.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the heading text of a release.
pub(crate) fn release_heading(release: &Release) -> String {
    format!("[{}] - {}", release.name(), release.day().format(DAY_FORMAT))
}

/// Parses a release heading into its name and, when present, its day.
///
/// A day that is present but invalid rejects the heading.
pub(crate) fn parse_heading(text: &str) -> Option<(String, Option<NaiveDate>)> {
    let captures = HEADING_RE.captures(text.trim())?;
    let name = captures.name("name")?.as_str().to_string();
    let day = match captures.name("day") {
        Some(day) => Some(NaiveDate::parse_from_str(day.as_str(), DAY_FORMAT).ok()?),
        None => None,
    };
    Some((name, day))
}

/// An inline piece of a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Strong(String),
    Link { text: String, url: String },
}

/// Accumulates the tokens of one list item.
///
/// Emphasis inside links and links inside emphasis are flattened into the
/// outer token.
#[derive(Debug, Default)]
pub(crate) struct TokenBuffer {
    tokens: Vec<Token>,
    strong: Option<String>,
    link: Option<(String, String)>,
}

impl TokenBuffer {
    pub(crate) fn text(&mut self, text: &str) {
        if let Some((link_text, _)) = &mut self.link {
            link_text.push_str(text);
        } else if let Some(strong) = &mut self.strong {
            strong.push_str(text);
        } else if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Text(text.to_string()));
        }
    }

    pub(crate) fn start_strong(&mut self) {
        if self.link.is_none() && self.strong.is_none() {
            self.strong = Some(String::new());
        }
    }

    pub(crate) fn end_strong(&mut self) {
        if self.link.is_none()
            && let Some(strong) = self.strong.take()
        {
            self.tokens.push(Token::Strong(strong));
        }
    }

    pub(crate) fn start_link(&mut self, url: &str) {
        if self.link.is_none() && self.strong.is_none() {
            self.link = Some((String::new(), url.to_string()));
        }
    }

    pub(crate) fn end_link(&mut self) {
        if let Some((text, url)) = self.link.take() {
            self.tokens.push(Token::Link { text, url });
        }
    }

    pub(crate) fn finish(mut self) -> Vec<Token> {
        self.end_link();
        self.end_strong();
        self.tokens
    }
}

/// A change read back from a list item.
#[derive(Debug)]
pub(crate) struct ParsedItem {
    pub(crate) source: ChangeSource,
    pub(crate) description: String,
}

/// Interprets the tokens of a list item.
///
/// The description is the first strong token. Before it, the first link
/// (or plain label) identifies the source; after it, an `@`-prefixed link or
/// text names the author. Items without a description or a label are
/// rejected.
pub(crate) fn parse_item(tokens: &[Token], day: NaiveDate) -> Option<ParsedItem> {
    let strong_at = tokens
        .iter()
        .position(|token| matches!(token, Token::Strong(_)))?;
    let Token::Strong(description) = &tokens[strong_at] else {
        return None;
    };

    let mut label: Option<&str> = None;
    let mut url = "";
    for token in &tokens[..strong_at] {
        match token {
            Token::Link { text, url: target } if label.is_none() => {
                label = Some(text.trim());
                url = target.as_str();
            }
            Token::Text(text) if label.is_none() => {
                let trimmed = text.trim().trim_end_matches('-').trim();
                if !trimmed.is_empty() {
                    label = Some(trimmed);
                }
            }
            _ => {}
        }
    }

    let mut author = "";
    let mut author_url = "";
    for token in &tokens[strong_at + 1..] {
        match token {
            Token::Link { text, url: target } => {
                if let Some(handle) = text.trim().strip_prefix('@') {
                    author = handle;
                    author_url = target.as_str();
                }
            }
            Token::Text(text) => {
                if let Some(at) = text.find('@') {
                    author = text[at + 1..].trim();
                }
            }
            Token::Strong(_) => {}
        }
    }

    let timestamp = day.and_time(NaiveTime::MIN).and_utc();
    let source = build_source(label?, url, description.trim(), author, author_url, timestamp)?;

    Some(ParsedItem {
        source,
        description: description.trim().to_string(),
    })
}

fn build_source(
    label: &str,
    url: &str,
    description: &str,
    author: &str,
    author_url: &str,
    timestamp: DateTime<Utc>,
) -> Option<ChangeSource> {
    let number = if let Some(captures) = PULL_URL_RE.captures(url) {
        captures["number"].parse::<u64>().ok()
    } else if COMMIT_URL_RE.is_match(url) {
        None
    } else {
        label.strip_prefix('#').and_then(|n| n.parse().ok())
    };

    if let Some(number) = number {
        let pr = PullRequest::new(number, description, author, timestamp)
            .with_url(url)
            .with_author_url(author_url)
            .with_merged_at(timestamp);
        return Some(pr.into());
    }

    let sha = COMMIT_URL_RE
        .captures(url)
        .map_or(label, |captures| captures.name("sha").map_or(label, |m| m.as_str()));
    if sha.is_empty() || sha.contains(char::is_whitespace) {
        return None;
    }

    let commit = Commit::new(sha, description, author, timestamp)
        .with_url(url)
        .with_author_url(author_url);
    Some(commit.into())
}

/// A release being read, with its changes regrouped by source.
struct ReleaseBuilder {
    name: String,
    day: NaiveDate,
    sources: IndexMap<String, Changes>,
    sections: IndexMap<ChangeType, Vec<String>>,
}

impl ReleaseBuilder {
    fn new(name: String, day: NaiveDate) -> Self {
        Self {
            name,
            day,
            sources: IndexMap::new(),
            sections: IndexMap::new(),
        }
    }

    fn add(&mut self, item: ParsedItem, change_type: ChangeType) {
        let id = item.source.id();
        let change = Changes::single(Change::new(item.source, change_type, item.description));

        let merged = match self.sources.get(&id) {
            Some(existing) => existing.merge(&change),
            None => Ok(change),
        };
        match merged {
            Ok(changes) => {
                self.sources.insert(id.clone(), changes);
                let section = self.sections.entry(change_type).or_default();
                if !section.contains(&id) {
                    section.push(id);
                }
            }
            Err(err) => warn!(release = %self.name, error = %err, "skipping change"),
        }
    }

    /// Orders the sources so that every type section reads back in the
    /// order it was written.
    ///
    /// Parsed sources all carry the release day, so the release lists them
    /// in insertion order. Neighbours within a section must keep their
    /// relative order; otherwise the source seen first goes first.
    fn order(&self) -> Vec<usize> {
        let count = self.sources.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut pending = vec![0usize; count];
        for section in self.sections.values() {
            let positions: Vec<usize> = section
                .iter()
                .filter_map(|id| self.sources.get_index_of(id))
                .collect();
            for pair in positions.windows(2) {
                successors[pair[0]].push(pair[1]);
                pending[pair[1]] += 1;
            }
        }

        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);
        while order.len() < count {
            // sections edited by hand can contradict each other
            let next = (0..count)
                .find(|&index| !placed[index] && pending[index] == 0)
                .or_else(|| (0..count).find(|&index| !placed[index]));
            let Some(next) = next else {
                break;
            };
            placed[next] = true;
            order.push(next);
            for &successor in &successors[next] {
                pending[successor] = pending[successor].saturating_sub(1);
            }
        }
        order
    }

    fn build(self) -> Release {
        let order = self.order();
        let mut slots: Vec<Option<Changes>> = self.sources.into_values().map(Some).collect();
        let mut release = Release::new(self.name, self.day);
        for index in order {
            if let Some(changes) = slots[index].take() {
                release.add(changes);
            }
        }
        release
    }
}

/// Assembles releases from headings and items in document order.
#[derive(Default)]
pub(crate) struct DocumentBuilder {
    releases: Vec<Release>,
    current: Option<ReleaseBuilder>,
    section: Option<ChangeType>,
    undated_day: Option<NaiveDate>,
}

impl DocumentBuilder {
    /// Creates a builder that gives an undated "Unreleased" heading
    /// `undated_day`. Without a day such headings are skipped.
    pub(crate) fn new(undated_day: Option<NaiveDate>) -> Self {
        Self {
            undated_day,
            ..Self::default()
        }
    }

    /// Starts a release. A heading without a name and day, other than an
    /// "Unreleased" heading dated by the builder, starts a skipped section:
    /// its items are ignored until the next release heading.
    pub(crate) fn release_heading(&mut self, text: &str) {
        self.flush();
        self.section = None;

        let undated_day = self.undated_day;
        let heading = parse_heading(text).and_then(|(name, day)| {
            let day = day.or_else(|| {
                undated_day.filter(|_| name.eq_ignore_ascii_case(UNRELEASED))
            })?;
            Some((name, day))
        });
        match heading {
            Some((name, day)) => self.current = Some(ReleaseBuilder::new(name, day)),
            None => debug!(heading = text.trim(), "skipping malformed release heading"),
        }
    }

    /// Starts a change type section. Unknown types are skipped.
    pub(crate) fn type_heading(&mut self, text: &str) {
        self.section = ChangeType::from_str(text).ok();
        if self.section.is_none() && self.current.is_some() {
            debug!(heading = text.trim(), "skipping unknown change type section");
        }
    }

    /// Adds a list item to the current section.
    pub(crate) fn item(&mut self, tokens: &[Token]) {
        let (Some(release), Some(change_type)) = (&mut self.current, self.section) else {
            return;
        };
        match parse_item(tokens, release.day) {
            Some(item) => release.add(item, change_type),
            None => debug!(release = %release.name, "skipping malformed change"),
        }
    }

    /// Returns the releases read so far. Later releases reusing a name are
    /// dropped.
    pub(crate) fn finish(mut self) -> Releases {
        self.flush();

        let mut releases = Releases::new();
        for release in self.releases {
            match releases.add(release) {
                Ok(added) => releases = added,
                Err(err) => warn!(error = %err, "skipping duplicate release"),
            }
        }
        releases
    }

    fn flush(&mut self) {
        if let Some(current) = self.current.take() {
            self.releases.push(current.build());
        }
    }
}
