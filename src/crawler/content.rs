//! Main content extraction
//!
//! Works on its own parsed tree: noise subtrees are detached first, then
//! the most likely content container is picked and flattened to text.
//! The heuristics are plain keyword matches over tags, classes and ids;
//! they approximate a boilerplate remover and nothing more.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Maximum characters kept in `raw_content`
pub const MAX_CONTENT_CHARS: usize = 100_000;

/// Maximum characters kept in an excerpt
pub const EXCERPT_CHARS: usize = 300;

/// Tags whose entire subtree is noise
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript", "iframe", "form",
    "button", "input", "select", "textarea", "label",
];

/// Class/id keywords marking noise elements
static NOISE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(nav|menu|sidebar|footer|header|ads?|advertisement|cookie|popup|modal|social|share|related|comment|breadcrumb|pagination|widget|banner)\b",
    )
    .expect("NOISE_PATTERN: hardcoded regex is valid")
});

static CONTENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(content|main|article|post|body)")
        .expect("CONTENT_ID_PATTERN: hardcoded regex is valid")
});

static CONTENT_CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(content|main|article|post|entry)")
        .expect("CONTENT_CLASS_PATTERN: hardcoded regex is valid")
});

/// Text of the selected main content region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainContent {
    /// Collapsed text, truncated to [`MAX_CONTENT_CHARS`]
    pub text: String,

    /// Word count of the full (untruncated) text
    pub word_count: usize,
}

impl MainContent {
    /// First [`EXCERPT_CHARS`] characters of the text, or `None` when empty
    pub fn excerpt(&self) -> Option<String> {
        let excerpt = truncate_chars(&self.text, EXCERPT_CHARS).trim().to_string();
        (!excerpt.is_empty()).then_some(excerpt)
    }
}

/// Extracts the main content text from raw HTML
///
/// The HTML is parsed into a fresh tree here, so callers keep their own
/// unmodified tree for link and metadata extraction.
pub fn extract_main_content(html: &str) -> MainContent {
    let mut document = Html::parse_document(html);
    if is_noise(&document.root_element()) {
        return MainContent::default();
    }
    strip_noise(&mut document);

    let text = select_main_region(&document)
        .map(|element| element_text(&element))
        .unwrap_or_default();
    let word_count = text.split_whitespace().count();

    MainContent {
        text: truncate_chars(&text, MAX_CONTENT_CHARS),
        word_count,
    }
}

/// Detaches every noise subtree from the document
fn strip_noise(document: &mut Html) {
    let root = document.root_element();
    let root_id = root.id();

    let noise: Vec<_> = root
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.id() != root_id && is_noise(element))
        .map(|element| element.id())
        .collect();

    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn is_noise(element: &ElementRef) -> bool {
    let value = element.value();
    NOISE_TAGS.contains(&value.name())
        || value.attr("class").is_some_and(|class| NOISE_PATTERN.is_match(class))
        || value.attr("id").is_some_and(|id| NOISE_PATTERN.is_match(id))
}

/// Picks the content container
///
/// Priority: `<main>`, `<article>`, content-like id, content-like class
/// (first element with text wins), then `<body>` regardless of text.
fn select_main_region(document: &Html) -> Option<ElementRef<'_>> {
    let root = document.root_element();

    first_with_text(root, |element| element.value().name() == "main")
        .or_else(|| first_with_text(root, |element| element.value().name() == "article"))
        .or_else(|| {
            first_with_text(root, |element| {
                element
                    .value()
                    .id()
                    .is_some_and(|id| CONTENT_ID_PATTERN.is_match(id))
            })
        })
        .or_else(|| {
            first_with_text(root, |element| {
                element
                    .value()
                    .classes()
                    .any(|class| CONTENT_CLASS_PATTERN.is_match(class))
            })
        })
        .or_else(|| {
            root.descendants()
                .filter_map(ElementRef::wrap)
                .find(|element| element.value().name() == "body")
        })
}

fn first_with_text<'a>(
    root: ElementRef<'a>,
    matches: impl Fn(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| matches(element) && has_text(element))
}

fn has_text(element: &ElementRef) -> bool {
    element.text().any(|text| !text.trim().is_empty())
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
