//! Integration tests for Site-Harvest
//!
//! These tests use wiremock to create mock HTTP servers and drive the
//! crawl and bulk extraction paths end-to-end.

mod crawl_tests;
mod extract_tests;

use site_harvest::config::{Config, CrawlParams};
use site_harvest::normalize_url;
use site_harvest::CrawlOutcome;
use std::collections::HashSet;
use wiremock::ResponseTemplate;

/// Defaults with short retry backoff and timeout so tests run quickly
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.retry_backoff_ms = 10;
    config.http.timeout_secs = 2;
    config
}

/// Crawl limits at the fastest allowed rate
pub fn fast_params(max_depth: u32, max_pages: usize) -> CrawlParams {
    CrawlParams {
        max_depth,
        max_pages,
        rate_limit: 10.0,
    }
}

/// A 200 response with an HTML body
pub fn html(body: &str) -> ResponseTemplate {
    html_with_status(200, body)
}

pub fn html_with_status(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// A page with a title and one anchor per link
pub fn page_with_links(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><p>{} body text</p>{}</main></body></html>",
        title, title, anchors
    )
}

/// Checks the bookkeeping every crawl outcome must satisfy
pub fn assert_outcome_consistent(outcome: &CrawlOutcome, max_pages: usize) {
    assert_eq!(outcome.pages.len(), outcome.crawled_count);
    assert_eq!(outcome.errors.len(), outcome.error_count);
    assert!(outcome.crawled_count <= max_pages);

    let mut keys = HashSet::new();
    let urls = outcome
        .pages
        .iter()
        .map(|page| page.url.as_str())
        .chain(outcome.errors.iter().map(|error| error.url.as_str()));
    for url in urls {
        let key = normalize_url(&url::Url::parse(url).unwrap());
        assert!(keys.insert(key.clone()), "{} appears twice", key);
    }
}
