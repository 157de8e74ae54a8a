//! Rate-limit handling for 429 responses.
//!
//! Strava reports limits as `X-RateLimit-Limit` / `X-RateLimit-Usage`, each a
//! `"<15-minute>,<daily>"` pair, and may send `Retry-After`. The waiter turns
//! those headers into a single pause before the caller's next attempt.

use crate::http::HttpResponse;
use std::time::Duration;

/// Length of Strava's short rate-limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Pause used when the headers give nothing better to go on.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// What a rate-limited response said about when to come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateLimitSignal {
    /// Explicit `Retry-After`.
    RetryAfter(Duration),
    /// Both usage headers were present and numeric.
    Usage { limit: i64, usage: i64 },
    /// No usable headers.
    #[default]
    Absent,
}

impl RateLimitSignal {
    /// Parse from response headers. Unparseable values count as absent.
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_headers(
            response.header("Retry-After"),
            response.header("X-RateLimit-Limit"),
            response.header("X-RateLimit-Usage"),
        )
    }

    pub fn from_headers(
        retry_after: Option<&str>,
        limit: Option<&str>,
        usage: Option<&str>,
    ) -> Self {
        if let Some(wait) = retry_after.and_then(parse_retry_after) {
            return RateLimitSignal::RetryAfter(wait);
        }
        match (limit.and_then(leading_int), usage.and_then(leading_int)) {
            (Some(limit), Some(usage)) => RateLimitSignal::Usage { limit, usage },
            _ => RateLimitSignal::Absent,
        }
    }

    /// How long to wait before the next attempt.
    ///
    /// A quota that is not yet used up still gets the default pause: the 429
    /// itself says the condition is transient.
    pub fn wait_duration(&self) -> Duration {
        match *self {
            RateLimitSignal::RetryAfter(d) => d,
            RateLimitSignal::Usage { limit, usage } if usage >= limit => RATE_LIMIT_WINDOW,
            RateLimitSignal::Usage { .. } | RateLimitSignal::Absent => DEFAULT_RATE_LIMIT_WAIT,
        }
    }
}

/// Sleep for the duration implied by `signal`. Never fails.
pub async fn wait_for_rate_limit(signal: &RateLimitSignal) {
    let wait = signal.wait_duration();
    tracing::warn!(
        "rate limited ({:?}); waiting {}ms before retry",
        signal,
        wait.as_millis()
    );
    tokio::time::sleep(wait).await;
}

/// Positive number of seconds, rounded up to whole milliseconds.
///
/// Only the leading decimal is read, so `"2abc"` is two seconds and an
/// HTTP-date yields nothing.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = leading_decimal(value.trim())?.parse().ok()?;
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let millis = (secs * 1000.0).ceil();
    if millis > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_millis(millis as u64))
}

/// The `[+-]digits[.digits]` prefix of `s`, if it has at least one digit.
fn leading_decimal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    (digits > 0).then(|| &s[..end])
}

/// Leading integer of a header value, e.g. `600` from `"600,30000"`.
fn leading_int(value: &str) -> Option<i64> {
    let s = value.trim();
    let digits_start = usize::from(s.starts_with('-') || s.starts_with('+'));
    let end = s[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
