//! Retry combinator.
//!
//! # Responsibilities
//! - Re-run a classified call while it keeps failing at the network level
//! - Sleep with capped exponential backoff between attempts
//!
//! # Design Decisions
//! - Only `NetworkError` is transient; server and decode errors return at once
//! - The last attempt always runs and its result is returned as-is
//! - Backoff sleeps on the tokio timer, so dropping the future cancels the wait

mod backoff;

pub use backoff::{next_delay, whole_millis, Backoff};

use std::future::Future;
use std::time::Duration;

use crate::observability::metrics;
use crate::response::NetworkResult;

/// Bounded retry schedule.
///
/// Delays are slept in whole milliseconds; sub-millisecond parts of
/// `initial_delay` and `max_delay` are truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub times: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Upper bound for every following delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            times: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(times: u32, initial_delay: Duration, max_delay: Duration, factor: f64) -> Self {
        Self {
            times,
            initial_delay,
            max_delay,
            factor,
        }
    }

    /// Delays slept between attempts, in order.
    pub fn delays(&self) -> Backoff {
        Backoff::new(self.initial_delay, self.factor, self.max_delay)
    }

    pub async fn execute<S, E, F, Fut>(&self, operation: F) -> NetworkResult<S, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = NetworkResult<S, E>>,
    {
        execute_with_retry(self, operation).await
    }
}

/// Run `operation` up to `policy.times` times.
///
/// Attempts before the last return immediately unless they end in
/// `NetworkError`; the last attempt's result is returned whatever it is.
/// `times <= 1` means a single attempt.
pub async fn execute_with_retry<S, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> NetworkResult<S, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = NetworkResult<S, E>>,
{
    let mut delays = policy.delays();

    for attempt in 1..policy.times {
        match operation().await {
            NetworkResult::NetworkError { cause } => {
                let delay = delays.next().unwrap_or_default();
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %cause,
                    "Network error, retrying"
                );
                metrics::record_retry();
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }

    operation().await
}
