//! Retry and backoff policy.
//!
//! This module owns the exponential backoff decision and the async retry
//! loop shared by every Strava call, plus the mapping from upstream HTTP
//! statuses to [`ErrorCode`](crate::error::ErrorCode)s.

mod classify;
mod policy;
mod run;

pub use classify::classify_http_status;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
