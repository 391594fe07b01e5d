//! Statistics generation from crawl and extract outcomes
//!
//! This module condenses a run's result into counts for the human-readable
//! summary printed next to the JSON output.

use crate::model::{CrawlOutcome, ExtractOutcome};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use url::Url;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// URLs that produced either a page or an error
    pub total_urls: u64,

    /// Pages successfully extracted
    pub pages: u64,

    /// URLs that failed
    pub errors: u64,

    /// Sum of word counts over all pages
    pub total_words: u64,

    /// Number of distinct hosts among extracted pages
    pub unique_hosts: u64,

    /// Error kinds and their counts, e.g. `HTTP 404` or `connection error`
    pub error_summary: BTreeMap<String, u64>,
}

impl CrawlStatistics {
    /// Summarizes a crawl outcome
    pub fn from_crawl(outcome: &CrawlOutcome) -> Self {
        let mut stats = Self::default();
        for page in &outcome.pages {
            stats.record_page(page.word_count);
        }
        for error in &outcome.errors {
            stats.record_error(&error.error);
        }
        stats.finish(outcome.pages.iter().map(|page| page.url.as_str()))
    }

    /// Summarizes the outcomes of a bulk extraction
    pub fn from_extract(outcomes: &[ExtractOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            match &outcome.error {
                Some(error) => stats.record_error(error),
                None => stats.record_page(outcome.word_count),
            }
        }
        stats.finish(
            outcomes
                .iter()
                .filter(|outcome| !outcome.is_error())
                .map(|outcome| outcome.url.as_str()),
        )
    }

    /// Percentage of URLs that produced a page
    pub fn success_rate(&self) -> f64 {
        if self.total_urls > 0 {
            (self.pages as f64 / self.total_urls as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record_page(&mut self, word_count: Option<usize>) {
        self.pages += 1;
        self.total_words += word_count.unwrap_or(0) as u64;
    }

    fn record_error(&mut self, error: &str) {
        self.errors += 1;
        *self.error_summary.entry(error_kind(error)).or_insert(0) += 1;
    }

    fn finish<'a>(mut self, page_urls: impl Iterator<Item = &'a str>) -> Self {
        self.total_urls = self.pages + self.errors;
        self.unique_hosts = page_urls
            .filter_map(|url| Url::parse(url).ok())
            .filter_map(|url| url.host_str().map(str::to_lowercase))
            .collect::<HashSet<_>>()
            .len() as u64;
        self
    }
}

/// Error text up to the first `:` (detail after it varies per URL)
fn error_kind(error: &str) -> String {
    error
        .split_once(':')
        .map(|(kind, _)| kind)
        .unwrap_or(error)
        .trim()
        .to_string()
}

/// Formats statistics for display
pub fn render_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Harvest Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  URLs processed: {}", stats.total_urls);
    let _ = writeln!(out, "  Pages extracted: {}", stats.pages);
    let _ = writeln!(out, "  Errors: {}", stats.errors);
    let _ = writeln!(out, "  Unique hosts: {}", stats.unique_hosts);
    let _ = writeln!(out, "  Total words: {}", stats.total_words);
    if stats.pages > 0 {
        let _ = writeln!(
            out,
            "  Average words per page: {:.0}",
            stats.total_words as f64 / stats.pages as f64
        );
    }
    let _ = writeln!(out);

    if !stats.error_summary.is_empty() {
        let _ = writeln!(out, "Error Summary:");
        // Sort kinds by count (descending)
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            let _ = writeln!(out, "  {}: {}", kind, count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} URLs successfully extracted)",
        stats.success_rate(),
        stats.pages,
        stats.total_urls
    );

    out
}

/// Prints statistics to stderr, keeping stdout free for JSON
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", render_statistics(stats));
}
