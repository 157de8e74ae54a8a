//! Retry loop: run an async operation until success or policy says stop.

use super::policy::{RetryDecision, RetryPolicy};
use crate::error::RetryClassify;
use std::fmt::Display;
use std::future::Future;

/// Runs `op` until it succeeds or the retry policy says to stop.
///
/// Attempts are strictly sequential. On a retryable failure, sleeps for the
/// backoff duration then tries again; the last failure is returned unchanged.
pub async fn run_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryClassify + Display,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt, e.activity_error()) {
                RetryDecision::NoRetry => {
                    if attempt > 0 {
                        tracing::debug!("giving up after {} attempts: {}", attempt + 1, e);
                    }
                    return Err(e);
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        "attempt {} failed ({}); retrying in {}ms",
                        attempt + 1,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}
