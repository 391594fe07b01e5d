//! Result shapes produced by the crawler and the bulk extractor
//!
//! These are plain data: the coordinator builds them incrementally and
//! hands them back whole, and they serialize to the same JSON shape the
//! inbound API contract expects (absent fields become `null`).

use serde::{Deserialize, Serialize};

/// Clean text and metadata extracted from one HTML page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Final URL of the page, after redirects
    pub url: String,

    /// Page title; falls back to the URL when the page has none
    pub title: Option<String>,

    /// Meta description, if the page declares one
    pub description: Option<String>,

    /// Whitespace-collapsed main content text
    pub raw_content: Option<String>,

    /// Number of whitespace-delimited words in the main content
    pub word_count: Option<usize>,

    /// Leading slice of the main content
    pub excerpt: Option<String>,

    /// Publication date as `YYYY-MM-DD`
    pub published_at: Option<String>,
}

/// A per-URL failure recorded during a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageError {
    pub url: String,
    pub error: String,
}

/// Everything a crawl run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub pages: Vec<PageRecord>,
    pub crawled_count: usize,
    pub error_count: usize,
    pub errors: Vec<PageError>,
}

impl CrawlOutcome {
    /// Records an accepted page
    pub fn push_page(&mut self, page: PageRecord) {
        self.pages.push(page);
        self.crawled_count += 1;
    }

    /// Records a failed URL
    pub fn push_error(&mut self, url: impl Into<String>, error: impl Into<String>) {
        self.errors.push(PageError {
            url: url.into(),
            error: error.into(),
        });
        self.error_count += 1;
    }
}

/// Result of extracting a single URL in a bulk run
///
/// Exactly one of the content fields or `error` is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOutcome {
    /// The URL as it was requested (not the post-redirect URL)
    pub url: String,
    pub title: Option<String>,
    pub raw_content: Option<String>,
    pub word_count: Option<usize>,
    pub excerpt: Option<String>,
    pub published_at: Option<String>,
    pub error: Option<String>,
}

impl ExtractOutcome {
    /// Builds a successful outcome from an extracted page
    pub fn from_page(requested_url: impl Into<String>, page: PageRecord) -> Self {
        Self {
            url: requested_url.into(),
            title: page.title,
            raw_content: page.raw_content,
            word_count: page.word_count,
            excerpt: page.excerpt,
            published_at: page.published_at,
            error: None,
        }
    }

    /// Builds a failed outcome
    pub fn failed(requested_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: requested_url.into(),
            title: None,
            raw_content: None,
            word_count: None,
            excerpt: None,
            published_at: None,
            error: Some(error.into()),
        }
    }

    /// Returns true if this URL failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
