//! Global request pacing for a crawl run
//!
//! A single limiter gates every request of one crawl, whatever host it
//! targets. It remembers when the previous request started and sleeps off
//! whatever remains of the minimum interval before letting the next one go.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Slowest accepted request rate, in requests per second
const MIN_RATE: f64 = 0.1;

/// Enforces a minimum interval between consecutive request starts
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter for `rate` requests per second
    ///
    /// Rates below 0.1 (and non-finite rates) are treated as 0.1, so the
    /// interval never exceeds ten seconds.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() { rate.max(MIN_RATE) } else { MIN_RATE };

        Self {
            interval: Duration::from_secs_f64(1.0 / rate),
            last_request: None,
        }
    }

    /// Minimum time between two request starts
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the next request may start, then records its start time
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                tracing::trace!("Rate limiter sleeping {:?}", remaining);
                sleep(remaining).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}
