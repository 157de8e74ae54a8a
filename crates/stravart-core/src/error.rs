//! Activity error taxonomy.
//!
//! Every failure surfaced by the fetch pipeline is an [`ActivityError`]: a
//! fixed [`ErrorCode`] plus a human-readable message. Whether the error is
//! worth retrying is derived from the code, so the two can never disagree.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed set of failure kinds produced by the activity pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidId,
    NotFound,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServerError,
    NetworkError,
    ValidationFailed,
    MalformedResponse,
}

impl ErrorCode {
    /// Transient kinds (rate limit, server error, network error) are retryable.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorCode::RateLimited | ErrorCode::ServerError | ErrorCode::NetworkError
        )
    }

    /// Wire name, e.g. `RATE_LIMITED`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "INVALID_ID",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::MalformedResponse => "MALFORMED_RESPONSE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure of an activity operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ActivityError {
    code: ErrorCode,
    message: String,
}

impl ActivityError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn retryable(&self) -> bool {
        self.code.is_retryable()
    }

    /// Status an HTTP front-end should answer with for this error.
    ///
    /// Rate limiting is absorbed by retries and therefore reported as a
    /// plain 500 once retries are exhausted.
    pub fn http_status(&self) -> u16 {
        match self.code {
            ErrorCode::NotFound => 404,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::InvalidId => 400,
            _ => 500,
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidId, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedResponse, message)
    }
}

/// Wire form: `{"code": ..., "message": ..., "retryable": ...}`.
#[derive(Serialize, Deserialize)]
struct WireError {
    code: ErrorCode,
    message: String,
    #[serde(default)]
    retryable: Option<bool>,
}

impl Serialize for ActivityError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireError {
            code: self.code,
            message: self.message.clone(),
            retryable: Some(self.retryable()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActivityError {
    /// The `retryable` flag on the wire is ignored; it is recomputed from the code.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireError::deserialize(deserializer)?;
        Ok(ActivityError::new(wire.code, wire.message))
    }
}

/// Extracts the structured [`ActivityError`] carried by a failure, if any.
///
/// Failures without one are treated as non-retryable by the retry loop.
pub trait RetryClassify {
    fn activity_error(&self) -> Option<&ActivityError>;
}

impl RetryClassify for ActivityError {
    fn activity_error(&self) -> Option<&ActivityError> {
        Some(self)
    }
}

impl RetryClassify for anyhow::Error {
    fn activity_error(&self) -> Option<&ActivityError> {
        self.downcast_ref::<ActivityError>()
    }
}
