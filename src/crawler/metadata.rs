//! Page metadata extraction
//!
//! Title, description and publication date are read from the unmodified
//! document. Each field walks a fixed list of sources in priority order
//! and takes the first one that yields a usable value.

use crate::crawler::content::{collapse_whitespace, truncate_chars};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Maximum characters kept for titles and descriptions
pub const MAX_META_CHARS: usize = 500;

/// Meta tags consulted for the title, before `<title>` and `<h1>`
const TITLE_META: &[(&str, &str)] = &[("property", "og:title"), ("name", "twitter:title")];

/// Meta tags consulted for the description
const DESCRIPTION_META: &[(&str, &str)] = &[
    ("property", "og:description"),
    ("name", "description"),
    ("name", "twitter:description"),
];

/// Meta tags consulted for the publication date, before `<time datetime>`
const PUBLISHED_META: &[(&str, &str)] = &[
    ("property", "article:published_time"),
    ("property", "og:article:published_time"),
    ("name", "date"),
    ("name", "pubdate"),
    ("name", "DC.date"),
    ("itemprop", "datePublished"),
];

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("DATE_PREFIX: hardcoded regex is valid")
});

/// Metadata extracted from a page's head and markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Publication date as `YYYY-MM-DD`
    pub published_at: Option<String>,
}

/// Extracts title, description and publication date from a document
pub fn extract_metadata(document: &Html) -> PageMetadata {
    PageMetadata {
        title: extract_title(document),
        description: extract_description(document),
        published_at: extract_published_at(document),
    }
}

/// Title: `og:title`, `twitter:title`, `<title>`, then the first `<h1>`
///
/// The first source that is declared wins even if it trims to nothing, in
/// which case the page has no title.
fn extract_title(document: &Html) -> Option<String> {
    let title = TITLE_META
        .iter()
        .find_map(|(attr, value)| declared_meta(document, attr, value))
        .or_else(|| first_element_text(document, "title"))
        .or_else(|| first_element_text(document, "h1"))?;

    let title = truncate_chars(title.trim(), MAX_META_CHARS);
    (!title.is_empty()).then_some(title)
}

fn extract_description(document: &Html) -> Option<String> {
    DESCRIPTION_META
        .iter()
        .find_map(|(attr, value)| meta_content(document, attr, value))
        .map(|description| truncate_chars(&description, MAX_META_CHARS))
}

/// Publication date from meta tags, then from `<time datetime="...">`
fn extract_published_at(document: &Html) -> Option<String> {
    let from_meta = PUBLISHED_META.iter().find_map(|(attr, value)| {
        meta_content(document, attr, value).and_then(|content| date_prefix(&content))
    });
    if from_meta.is_some() {
        return from_meta;
    }

    let time_selector = Selector::parse("time[datetime]").ok()?;
    document
        .select(&time_selector)
        .filter_map(|element| element.value().attr("datetime"))
        .find_map(date_prefix)
}

/// Returns the first ten characters of `raw` if they form a `YYYY-MM-DD` date
fn date_prefix(raw: &str) -> Option<String> {
    let candidate = truncate_chars(raw.trim(), 10);
    DATE_PREFIX.is_match(&candidate).then_some(candidate)
}

/// Trimmed `content` of the first `<meta attr="value">`, if non-empty
fn meta_content(document: &Html, attr: &str, value: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, value)).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Raw `content` of the first `<meta attr="value">`, if the attribute is non-empty
fn declared_meta(document: &Html, attr: &str, value: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, value)).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Whitespace-collapsed text of the first element with the given tag
///
/// Present but empty elements yield `Some("")`.
fn first_element_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
}
