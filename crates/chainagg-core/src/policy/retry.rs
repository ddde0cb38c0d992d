//! Exponential backoff retry for arbitrary async operations.
//!
//! The delay before the `n`-th retry is `start_timeout * 2^(n-1)`, with no
//! jitter. Waiting goes through `tokio::time`, so tests can run the whole
//! attempt sequence on a paused clock.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for [`ExponentialRetry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_start_timeout_ms")]
    pub start_timeout_ms: u64,
    /// Maximum number of retry attempts (not counting the first try).
    /// `None` retries until the operation succeeds.
    #[serde(default = "default_max_retry_count")]
    pub max_retry_count: Option<u32>,
}

fn default_start_timeout_ms() -> u64 { 1_000 }
fn default_max_retry_count() -> Option<u32> { Some(5) }

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            start_timeout_ms: default_start_timeout_ms(),
            max_retry_count: default_max_retry_count(),
        }
    }
}

impl RetryConfig {
    pub fn new(start_timeout: Duration, max_retry_count: Option<u32>) -> Self {
        Self {
            start_timeout_ms: start_timeout.as_millis() as u64,
            max_retry_count,
        }
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }
}

/// Retries a failing operation with doubling delays.
///
/// The policy itself holds no attempt state; every [`call`](Self::call)
/// runs its own independent sequence.
#[derive(Debug, Clone)]
pub struct ExponentialRetry {
    pub config: RetryConfig,
}

impl ExponentialRetry {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the delay before the `attempt`-th retry (1-based).
    /// Returns `None` if `attempt` exceeds `max_retry_count`.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || !self.should_retry(attempt) {
            return None;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        Some(self.config.start_timeout().saturating_mul(factor))
    }

    /// Returns `true` if a retry is still allowed after `attempt` failures.
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.config.max_retry_count.map_or(true, |max| attempt <= max)
    }

    /// Run `op` until it succeeds or retries are exhausted.
    ///
    /// On exhaustion the error of the last attempt is returned.
    pub async fn call<F, Fut, T, E>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.call_when(op, |_| true).await
    }

    /// Like [`call`](Self::call), but only errors accepted by
    /// `should_retry` are retried; any other error is returned at once.
    pub async fn call_when<F, Fut, T, E, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(e) if should_retry(&e) => e,
                Err(e) => return Err(e),
            };
            match self.next_delay(attempt) {
                Some(delay) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(attempt, error = %err, "max retries exceeded");
                    return Err(err);
                }
            }
        }
    }
}
