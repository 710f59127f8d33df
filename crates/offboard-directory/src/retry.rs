//! Exponential backoff retry logic for directory API calls.
//!
//! One policy instance wraps every remote call type (list, invite,
//! deactivate) with identical parameters; the backoff loop is not
//! duplicated per call site.

use crate::error::{DirectoryError, DirectoryResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial one (0 = no retries).
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    pub base_delay_secs: u64,
    /// Maximum delay cap in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 7,
            base_delay_secs: 2,
            max_delay_secs: 300,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with the given max retries and base delay.
    /// The maximum delay cap defaults to 300 seconds.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_secs: u64) -> Self {
        Self {
            max_retries,
            base_delay_secs,
            max_delay_secs: 300,
        }
    }

    /// A policy that sleeps for zero time between attempts, for tests.
    #[must_use]
    pub fn without_delay() -> Self {
        Self {
            max_retries: 7,
            base_delay_secs: 0,
            max_delay_secs: 0,
        }
    }

    /// Whether the error should be retried at the given attempt number.
    ///
    /// Only [`DirectoryError::RateLimited`] re-enters the loop: remote
    /// failure payloads and transport errors surface immediately.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &DirectoryError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        error.is_rate_limited()
    }

    /// Calculate delay for the given attempt using exponential backoff.
    ///
    /// If the error is [`DirectoryError::RateLimited`] with a
    /// `retry_after_secs` hint, that value is used directly (capped at
    /// `max_delay_secs`). Otherwise the delay is
    /// `min(base_delay_secs * 2^attempt, max_delay_secs)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, error: &DirectoryError) -> Duration {
        let secs = if let DirectoryError::RateLimited {
            retry_after_secs: Some(retry_after),
        } = error
        {
            (*retry_after).min(self.max_delay_secs)
        } else {
            let exponential = self
                .base_delay_secs
                .saturating_mul(2u64.saturating_pow(attempt));
            exponential.min(self.max_delay_secs)
        };
        Duration::from_secs(secs)
    }

    /// Execute an async operation with retry.
    ///
    /// The closure `f` is called repeatedly until it succeeds, a
    /// non-rate-limit error is encountered, or the maximum number of
    /// retries is exhausted. The last retry runs at the clamped cap before
    /// the loop abandons with [`DirectoryError::RetriesExhausted`]; it
    /// never spins indefinitely.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> DirectoryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = DirectoryResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        if attempt >= self.max_retries && error.is_rate_limited() {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %error,
                                "max retries exceeded"
                            );
                            return Err(DirectoryError::RetriesExhausted {
                                attempts: attempt + 1,
                                message: format!(
                                    "{operation_name} failed after {} attempt(s): {error}",
                                    attempt + 1
                                ),
                            });
                        }
                        // Non-retryable error — return immediately.
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt, &error);
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_secs = delay.as_secs(),
                        "rate limited, backing off"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
