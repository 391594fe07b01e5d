//! Bulk extraction of independent URLs
//!
//! Every URL is fetched and extracted on its own: no link following, no
//! retries, no rate limiting. At most `concurrency` requests are in flight,
//! and results come back in input order.

use crate::crawler::fetcher::{fetch_document, FetchError};
use crate::model::ExtractOutcome;
use crate::url::parse_http_url;
use futures::stream::{self, StreamExt};
use reqwest::Client;

/// Extracts every URL in `urls`, returning one outcome per input in order
///
/// A `concurrency` of zero is treated as one.
pub async fn extract_urls(
    client: &Client,
    urls: &[String],
    concurrency: usize,
) -> Vec<ExtractOutcome> {
    let concurrency = concurrency.max(1);
    tracing::info!(
        "Extracting {} URLs with concurrency {}",
        urls.len(),
        concurrency
    );

    // `buffered` keeps input order even when later URLs finish first
    let outcomes: Vec<ExtractOutcome> =
        stream::iter(urls.iter().map(|url| extract_one(client, url)))
            .buffered(concurrency)
            .collect()
            .await;

    let failed = outcomes.iter().filter(|outcome| outcome.is_error()).count();
    tracing::info!(
        "Extraction completed: {} succeeded, {} failed",
        outcomes.len() - failed,
        failed
    );

    outcomes
}

async fn extract_one(client: &Client, url: &str) -> ExtractOutcome {
    let target = match parse_http_url(url) {
        Ok(target) => target,
        Err(e) => return ExtractOutcome::failed(url, FetchError::from(e).to_string()),
    };

    match fetch_document(client, &target).await {
        Ok(page) => {
            tracing::debug!("Extracted {} ({} words)", url, page.word_count.unwrap_or(0));
            ExtractOutcome::from_page(url, page)
        }
        Err(error) => {
            tracing::warn!("Failed to extract {}: {}", url, error);
            ExtractOutcome::failed(url, error.to_string())
        }
    }
}
