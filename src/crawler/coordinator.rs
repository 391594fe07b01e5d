//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop, which coordinates:
//! - The frontier queue and visited set
//! - Global rate limiting and retries around each fetch
//! - Scope and depth filtering of discovered links
//! - Accumulating pages and per-URL errors into the outcome

use crate::config::{Config, CrawlParams};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::ParsedPage;
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::retry::RetryPolicy;
use crate::model::CrawlOutcome;
use crate::state::EntryState;
use crate::url::{extract_domain, is_in_scope, normalize_url, parse_http_url};
use crate::HarvestError;
use reqwest::Client;
use std::time::Instant;

/// Main crawler coordinator structure
///
/// One coordinator serves one crawl: its rate limiter paces every request
/// of the run, whatever host it targets.
pub struct Coordinator {
    client: Client,
    params: CrawlParams,
    retry: RetryPolicy,
    rate_limiter: RateLimiter,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// `params` are clamped into their supported ranges first.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config, params: CrawlParams) -> Result<Self, HarvestError> {
        let params = params.clamped();
        let client = build_http_client(&config.http, &config.user_agent)?;

        Ok(Self {
            client,
            params,
            retry: RetryPolicy::from_config(&config.crawler),
            rate_limiter: RateLimiter::new(params.rate_limit),
        })
    }

    /// The effective (clamped) crawl limits
    pub fn params(&self) -> CrawlParams {
        self.params
    }

    /// Runs the crawl loop from `seed_url`
    ///
    /// Per-URL failures are recorded in the outcome and never abort the
    /// run. An unusable seed yields a single error record.
    pub async fn run(&mut self, seed_url: &str) -> CrawlOutcome {
        let mut outcome = CrawlOutcome::default();

        let seed = match parse_http_url(seed_url) {
            Ok(url) => url,
            Err(e) => {
                let error = FetchError::from(e);
                tracing::warn!("Rejecting seed {}: {}", seed_url, error);
                outcome.push_error(seed_url, error.to_string());
                return outcome;
            }
        };
        let Some(base_domain) = extract_domain(&seed) else {
            let error = FetchError::InvalidUrl("missing host".to_string());
            outcome.push_error(seed_url, error.to_string());
            return outcome;
        };

        tracing::info!(
            "Starting crawl of {} (max depth {}, max pages {}, {:.1} req/s)",
            seed,
            self.params.max_depth,
            self.params.max_pages,
            self.params.rate_limit
        );

        let start_time = Instant::now();
        let mut frontier = Frontier::new(seed);

        while outcome.crawled_count < self.params.max_pages {
            let Some(entry) = frontier.pop() else {
                tracing::debug!("Frontier is empty, crawl complete");
                break;
            };

            let key = normalize_url(&entry.url);
            if !frontier.mark_visited(key.clone()) {
                tracing::trace!("Already visited: {}", key);
                continue;
            }

            if let Err(e) = self
                .process_entry(entry, &key, &base_domain, &mut frontier, &mut outcome)
                .await
            {
                tracing::error!("Error processing {}: {}", key, e);
            }
        }

        if !frontier.is_empty() {
            tracing::debug!(
                "Page limit reached, discarding {} queued entries",
                frontier.len()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages, {} errors, {} URLs visited in {:?}",
            outcome.crawled_count,
            outcome.error_count,
            frontier.visited_count(),
            start_time.elapsed()
        );

        outcome
    }

    /// Fetches one frontier entry and folds the result into the outcome
    async fn process_entry(
        &mut self,
        entry: FrontierEntry,
        key: &str,
        base_domain: &str,
        frontier: &mut Frontier,
        outcome: &mut CrawlOutcome,
    ) -> Result<(), HarvestError> {
        let state = EntryState::Queued.transition(EntryState::InFlight)?;

        self.rate_limiter.wait().await;
        tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);

        let client = &self.client;
        let result = self
            .retry
            .run(&entry.url, || fetch_page(client, &entry.url))
            .await;

        match result {
            FetchResult::Page(parsed) => {
                let final_key = normalize_url(&parsed.final_url);
                if final_key != key && !frontier.mark_visited(final_key) {
                    state.transition(EntryState::SkippedDuplicate)?;
                    tracing::debug!(
                        "{} redirected to already visited {}",
                        entry.url,
                        parsed.final_url
                    );
                    return Ok(());
                }

                state.transition(EntryState::Accepted)?;
                self.accept_page(parsed, entry.depth, base_domain, frontier, outcome);
            }

            FetchResult::NonHtml { content_type } => {
                state.transition(EntryState::SkippedNonHtml)?;
                tracing::debug!("Skipping non-HTML {} ({})", entry.url, content_type);
            }

            FetchResult::Failed(error) => {
                state.transition(EntryState::Failed)?;
                tracing::warn!("Failed to fetch {}: {}", entry.url, error);
                outcome.push_error(entry.url.as_str(), error.to_string());
            }
        }

        Ok(())
    }

    /// Records a page and enqueues its in-scope links one level deeper
    fn accept_page(
        &self,
        parsed: ParsedPage,
        depth: u32,
        base_domain: &str,
        frontier: &mut Frontier,
        outcome: &mut CrawlOutcome,
    ) {
        let ParsedPage { page, links, .. } = parsed;
        tracing::debug!(
            "Accepted {} ({} words, {} links)",
            page.url,
            page.word_count.unwrap_or(0),
            links.len()
        );
        outcome.push_page(page);

        if depth >= self.params.max_depth {
            return;
        }

        let mut enqueued = 0;
        for link in links {
            if !is_in_scope(&link, base_domain) {
                tracing::trace!("Out of scope: {}", link);
                continue;
            }
            if frontier.is_visited(&normalize_url(&link)) {
                continue;
            }
            frontier.push(link, depth + 1);
            enqueued += 1;
        }
        tracing::debug!("Enqueued {} links at depth {}", enqueued, depth + 1);
    }
}

/// Runs a complete crawl with a fresh coordinator
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran (individual URLs may have failed)
/// * `Err(HarvestError)` - The HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::{Config, CrawlParams};
/// use site_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default(), "https://example.com", CrawlParams::default()).await?;
/// println!("{} pages", outcome.crawled_count);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    seed_url: &str,
    params: CrawlParams,
) -> Result<CrawlOutcome, HarvestError> {
    let mut coordinator = Coordinator::new(config, params)?;
    Ok(coordinator.run(seed_url).await)
}
