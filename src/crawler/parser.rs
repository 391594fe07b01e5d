//! HTML parser for extracting links and page records
//!
//! This module turns a fetched HTML body into:
//! - A [`PageRecord`] (metadata plus main content)
//! - The outbound links to consider for the frontier
//!
//! Links and metadata come from one parsed tree; main content is extracted
//! from a second, independently parsed tree because noise removal mutates it.

use crate::crawler::content::extract_main_content;
use crate::crawler::metadata::extract_metadata;
use crate::model::PageRecord;
use scraper::{Html, Selector};
use url::Url;

/// Link prefixes that never lead to a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// URL the page was served from, after redirects
    pub final_url: Url,

    /// The page record
    pub page: PageRecord,

    /// Outbound http(s) links, in document order (duplicates kept)
    pub links: Vec<Url>,
}

/// Parses HTML content into a page record and its outbound links
///
/// Relative links resolve against `final_url`. The title falls back to the
/// URL when the page has none.
///
/// # Example
///
/// ```
/// use site_harvest::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.page.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, final_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    let metadata = extract_metadata(&document);
    let links = extract_links(&document, final_url);
    drop(document);

    let content = extract_main_content(html);
    let excerpt = content.excerpt();

    let page = PageRecord {
        url: final_url.to_string(),
        title: Some(metadata.title.unwrap_or_else(|| final_url.to_string())),
        description: metadata.description,
        raw_content: Some(content.text),
        word_count: Some(content.word_count),
        excerpt,
        published_at: metadata.published_at,
    };

    ParsedPage {
        final_url: final_url.clone(),
        page,
        links,
    }
}

/// Extracts all followable links from `<a href>` elements
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only anchors
/// - `mailto:`, `tel:`, `javascript:` links
/// - unresolvable hrefs
/// - anything that is not HTTP(S) after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || SKIPPED_PREFIXES.iter().any(|prefix| href.starts_with(prefix)) {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    matches!(absolute_url.scheme(), "http" | "https").then_some(absolute_url)
}
