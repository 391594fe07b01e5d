//! Bounded retries for transient fetch failures
//!
//! Only timeouts, connection problems and 5xx responses are retried; every
//! other failure is returned on the first attempt. The delay grows linearly
//! with the attempt number.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::FetchResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// Returns true if an error message describes a transient failure
///
/// Transient means the message mentions a connection problem or a timeout,
/// or is an `HTTP 5xx` status.
pub fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("connection")
        || lower.contains("timeout")
        || lower.contains("timed out")
        || message.starts_with("HTTP 5")
}

/// How often and how patiently a failed fetch is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,

    /// Base delay, multiplied by the attempt number
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    /// Sleep before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }

    /// Runs `op` until it succeeds, fails permanently, or retries run out
    ///
    /// The result of the last attempt is returned as-is.
    pub async fn run<F, Fut>(&self, url: &Url, mut op: F) -> FetchResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchResult>,
    {
        let mut attempt = 0;

        loop {
            let result = op().await;

            let retryable = result.error().is_some_and(|error| error.is_retryable());
            if !retryable || attempt >= self.max_retries {
                return result;
            }

            attempt += 1;
            let delay = self.delay_for(attempt);
            if let Some(error) = result.error() {
                tracing::warn!(
                    "Retrying {} ({}/{}) in {:?} after: {}",
                    url,
                    attempt,
                    self.max_retries,
                    delay,
                    error
                );
            }
            sleep(delay).await;
        }
    }
}
