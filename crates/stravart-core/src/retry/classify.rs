//! Classify upstream HTTP statuses into activity error codes.

use crate::error::ErrorCode;

/// Classify an HTTP status code returned by the Strava API.
///
/// Returns `None` for 2xx. Statuses with no dedicated code (other 4xx, 3xx
/// that were not followed) are reported as `ServerError`.
pub fn classify_http_status(code: u32) -> Option<ErrorCode> {
    match code {
        200..=299 => None,
        401 => Some(ErrorCode::Unauthorized),
        403 => Some(ErrorCode::Forbidden),
        404 => Some(ErrorCode::NotFound),
        429 => Some(ErrorCode::RateLimited),
        _ => Some(ErrorCode::ServerError),
    }
}
