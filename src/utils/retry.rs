use crate::utils::error::{EtlError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::RetryIf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay after the first failure; the n-th failure waits `n * base_delay`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::no_retry()
    }
}

/// Linear backoff: the n-th failure waits `n * base_delay`, and the budget
/// allows `max_attempts - 1` waits.
fn backoff(policy: &RetryPolicy) -> impl Iterator<Item = Duration> {
    let base_delay = policy.base_delay;
    (1..policy.max_attempts).map(move |n| base_delay * n)
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the attempt budget is spent. The last error is returned as-is.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = AtomicU32::new(0);

    let action = || {
        attempts.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    let should_retry = |e: &EtlError| {
        let attempt = attempts.load(Ordering::SeqCst);
        let retry = e.is_retryable() && attempt < policy.max_attempts;
        if retry {
            tracing::warn!(
                "🔁 {} failed on attempt {}/{}: {} (retrying in {:?})",
                operation_name,
                attempt,
                policy.max_attempts,
                e,
                policy.base_delay * attempt
            );
        }
        retry
    };

    let result = RetryIf::spawn(backoff(policy), action, should_retry).await;

    let attempt = attempts.load(Ordering::SeqCst);
    if result.is_ok() && attempt > 1 {
        tracing::info!(
            "🔁 {} succeeded on attempt {}/{}",
            operation_name,
            attempt,
            policy.max_attempts
        );
    }
    result
}
