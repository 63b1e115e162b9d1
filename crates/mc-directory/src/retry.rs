//! Bounded retry with exponential backoff.
//!
//! Only errors for which [`DirectoryError::is_transient`] holds are retried.
//! Not-found, authentication and decode failures return immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::DirectoryResult;

/// Retry policy for directory requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each following retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay, including `Retry-After`.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Returns the delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `operation`, retrying transient failures.
    ///
    /// `label` only appears in log output.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> DirectoryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DirectoryResult<T>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && retry < self.max_retries => {
                    retry += 1;
                    let delay = e
                        .retry_after()
                        .map_or_else(|| self.backoff_for(retry), |d| d.min(self.max_backoff));
                    tracing::debug!(
                        request = %label,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying directory request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
