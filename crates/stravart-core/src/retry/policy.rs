use crate::config::RetryConfig;
use crate::error::ActivityError;
use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with a cap and no jitter.
///
/// Passed explicitly into every retried operation; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_retries: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
    ) -> anyhow::Result<Self> {
        if initial_backoff.is_zero() {
            anyhow::bail!("initial backoff must be positive");
        }
        if max_backoff < initial_backoff {
            anyhow::bail!(
                "max backoff ({:?}) must be >= initial backoff ({:?})",
                max_backoff,
                initial_backoff
            );
        }
        Ok(Self {
            max_retries,
            initial_backoff,
            max_backoff,
        })
    }

    pub fn from_config(cfg: &RetryConfig) -> anyhow::Result<Self> {
        Self::new(
            cfg.max_retries,
            Duration::from_millis(cfg.initial_backoff_ms),
            Duration::from_millis(cfg.max_backoff_ms),
        )
    }

    /// Delay before retry number `k` (0-based): `initial * 2^k`, capped.
    pub fn backoff_for(&self, k: u32) -> Duration {
        let factor = 1u32.checked_shl(k).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Decide what to do after attempt `attempt_index` (0-based) failed.
    ///
    /// `failure` is the structured error carried by the failure, if any.
    /// Unrecognized failures are never retried.
    pub fn decide(&self, attempt_index: u32, failure: Option<&ActivityError>) -> RetryDecision {
        let Some(err) = failure else {
            return RetryDecision::NoRetry;
        };
        if !err.retryable() || attempt_index >= self.max_retries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff_for(attempt_index))
    }
}
