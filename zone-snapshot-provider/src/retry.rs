//! Bounded retry with exponential backoff
//!
//! Listing calls and archive uploads share one policy: transient failures
//! (see [`ProviderError::is_retryable`]) are retried a small, fixed number of
//! times; everything else is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::{ProviderError, Result};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Retry policy for transient provider errors.
///
/// # Default
///
/// 2 retries, 100ms base delay doubling per attempt, capped at 10s.
/// A `Retry-After` hint from the API is honoured up to 30s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries (0 means a single attempt).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for the exponential backoff.
    pub max_delay: Duration,
    /// Upper bound for a server supplied `Retry-After`.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_retry_after: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy with the default delays and the given retry count.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// A policy that never sleeps between attempts.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_retry_after: Duration::ZERO,
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or the retries are used up.
    ///
    /// `op` is invoked once per attempt and must rebuild its request each time.
    /// The last error is returned when all attempts fail.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    let delay = self.delay_for(&e, attempt);
                    log::warn!(
                        "[{}] {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        e.provider(),
                        label,
                        attempt + 1,
                        self.max_retries + 1,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Delay before retrying after `error` on the given (0-based) attempt.
    ///
    /// Uses the API's `Retry-After` when present, otherwise exponential backoff.
    pub fn delay_for(&self, error: &ProviderError, attempt: u32) -> Duration {
        if let ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } = error
        {
            Duration::from_secs(*secs).min(self.max_retry_after)
        } else {
            self.backoff_delay(attempt)
        }
    }

    /// Exponential backoff: base, 2x base, 4x base, ... capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
        self.base_delay
            .saturating_mul(1_u32 << capped_attempt)
            .min(self.max_delay)
    }
}
