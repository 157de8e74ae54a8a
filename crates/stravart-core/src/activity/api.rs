//! Single-request calls against the Strava REST API.
//!
//! No retries or token refresh here: each call sends exactly one request and
//! classifies the outcome. Rate-limit headers are kept next to the error so
//! the caller can decide how long to wait.

use crate::error::{ActivityError, ErrorCode};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::rate_limit::RateLimitSignal;
use crate::retry::classify_http_status;
use anyhow::Context;
use std::fmt;

/// A failed API call: the classified error plus any rate-limit hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub error: ActivityError,
    /// Present only for `RateLimited` failures.
    pub rate_limit: Option<RateLimitSignal>,
}

impl From<ActivityError> for ApiFailure {
    fn from(error: ActivityError) -> Self {
        Self {
            error,
            rate_limit: None,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Paging and time-window options for the athlete activity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    /// Only activities before this Unix timestamp.
    pub before: Option<u64>,
    /// Only activities after this Unix timestamp.
    pub after: Option<u64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 30,
            before: None,
            after: None,
        }
    }
}

/// Which resource a call targets; only affects error wording.
#[derive(Debug, Clone, Copy)]
enum Resource {
    Activity,
    ActivityList,
}

pub struct StravaApi<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> StravaApi<T> {
    /// `base_url` is the API root, e.g. `https://www.strava.com/api/v3`.
    pub fn new(transport: T, base_url: &str) -> anyhow::Result<Self> {
        url::Url::parse(base_url).with_context(|| format!("invalid API base URL {}", base_url))?;
        Ok(Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `/activities/{id}`; returns the raw JSON body on success.
    pub async fn get_activity(&self, id: u64, access_token: &str) -> Result<Vec<u8>, ApiFailure> {
        let url = format!("{}/activities/{}", self.base_url, id);
        self.get(url, access_token, Resource::Activity).await
    }

    /// GET `/athlete/activities`; returns the raw JSON body on success.
    pub async fn list_activities(
        &self,
        access_token: &str,
        query: &ListQuery,
    ) -> Result<Vec<u8>, ApiFailure> {
        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params
            .append_pair("page", &query.page.to_string())
            .append_pair("per_page", &query.per_page.to_string());
        if let Some(before) = query.before {
            params.append_pair("before", &before.to_string());
        }
        if let Some(after) = query.after {
            params.append_pair("after", &after.to_string());
        }
        let url = format!("{}/athlete/activities?{}", self.base_url, params.finish());
        self.get(url, access_token, Resource::ActivityList).await
    }

    async fn get(
        &self,
        url: String,
        access_token: &str,
        resource: Resource,
    ) -> Result<Vec<u8>, ApiFailure> {
        let request = HttpRequest::get(url)
            .bearer(access_token)
            .header("Accept", "application/json");
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!("Strava API transport error: {}", e);
            ActivityError::network("Failed to connect to Strava API")
        })?;
        match classify_http_status(response.status) {
            None => Ok(response.body),
            Some(code) => Err(failure_for(code, &response, resource)),
        }
    }
}

fn failure_for(code: ErrorCode, response: &HttpResponse, resource: Resource) -> ApiFailure {
    let message = match code {
        ErrorCode::NotFound => "Activity not found".to_string(),
        ErrorCode::Unauthorized => "Authentication failed. Token may be expired or invalid.".to_string(),
        ErrorCode::Forbidden => match resource {
            Resource::Activity => "Insufficient permissions to access this activity".to_string(),
            Resource::ActivityList => "Insufficient permissions to access activities".to_string(),
        },
        ErrorCode::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
        _ if response.status >= 500 => "Strava API server error".to_string(),
        _ => format!("Unexpected API error: {}", response.status),
    };
    let rate_limit =
        (code == ErrorCode::RateLimited).then(|| RateLimitSignal::from_response(response));
    ApiFailure {
        error: ActivityError::new(code, message),
        rate_limit,
    }
}
