//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Metadata, main content and link extraction
//! - Global rate limiting and the breadth-first frontier
//! - Overall crawl coordination
//! - Bulk extraction of independent URLs

mod bulk;
mod content;
mod coordinator;
mod fetcher;
mod frontier;
mod metadata;
mod parser;
mod rate_limit;
mod retry;

pub use bulk::extract_urls;
pub use content::{
    collapse_whitespace, extract_main_content, MainContent, EXCERPT_CHARS, MAX_CONTENT_CHARS,
};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, fetch_document, fetch_page, FetchError, FetchResult, ACCEPT_HTML,
};
pub use frontier::{Frontier, FrontierEntry};
pub use metadata::{extract_metadata, PageMetadata, MAX_META_CHARS};
pub use parser::{parse_html, ParsedPage};
pub use rate_limit::RateLimiter;
pub use retry::{is_retryable_message, RetryPolicy};

use crate::config::{clamp_concurrency, Config, CrawlParams};
use crate::model::{CrawlOutcome, ExtractOutcome};
use crate::Result;

/// Crawls a site breadth-first from `seed_url`
///
/// This is the main entry point for a crawl. `params` are clamped into
/// their supported ranges; the rest of the behavior comes from `config`.
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Pages and per-URL errors
/// * `Err(HarvestError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, seed_url: &str, params: CrawlParams) -> Result<CrawlOutcome> {
    run_crawl(config, seed_url, params).await
}

/// Fetches and extracts each URL independently, preserving input order
///
/// `concurrency` is clamped to the supported range before use.
///
/// # Returns
///
/// * `Ok(Vec<ExtractOutcome>)` - One outcome per input URL
/// * `Err(HarvestError)` - The HTTP client could not be built
pub async fn bulk_extract(
    config: &Config,
    urls: &[String],
    concurrency: usize,
) -> Result<Vec<ExtractOutcome>> {
    let client = build_http_client(&config.http, &config.user_agent)?;
    Ok(extract_urls(&client, urls, clamp_concurrency(concurrency)).await)
}
