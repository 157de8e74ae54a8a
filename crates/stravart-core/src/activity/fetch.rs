//! Resilient activity fetching.
//!
//! One logical fetch is: validate the id, call the API, recover from a 401
//! by refreshing the access token once, map the response, and run the
//! optional validator. That whole sequence is the unit handed to
//! [`run_with_retry`], so a retryable failure anywhere restarts it from the
//! top. A 429 additionally waits out the rate limit before the failure
//! reaches the retry loop.

use super::api::{ApiFailure, ListQuery, StravaApi};
use super::id::validate_activity_id;
use super::transform::{transform_activities, transform_activity};
use super::types::Activity;
use crate::auth::{Credentials, TokenRefresher};
use crate::config::StravartConfig;
use crate::error::{ActivityError, ErrorCode};
use crate::http::Transport;
use crate::rate_limit::wait_for_rate_limit;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::validate::Validator;
use std::sync::{Arc, Mutex, PoisonError};

/// The API call a fetch step performs.
#[derive(Debug, Clone, Copy)]
enum ApiCall {
    Activity(u64),
    List(ListQuery),
}

/// Credentials in effect for one logical fetch.
///
/// Starts as a copy of the caller's value; a successful refresh replaces it so
/// later attempts reuse the new access token and any rotated refresh token.
struct FetchSession {
    creds: Mutex<Credentials>,
}

impl FetchSession {
    fn new(creds: &Credentials) -> Self {
        Self {
            creds: Mutex::new(creds.clone()),
        }
    }

    fn current(&self) -> Credentials {
        self.creds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, creds: Credentials) {
        *self.creds.lock().unwrap_or_else(PoisonError::into_inner) = creds;
    }
}

pub struct ActivityFetcher<T> {
    api: StravaApi<Arc<T>>,
    refresher: TokenRefresher<Arc<T>>,
    policy: RetryPolicy,
}

impl<T: Transport> ActivityFetcher<T> {
    pub fn new(
        transport: T,
        api_base_url: &str,
        oauth_token_url: &str,
        policy: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let transport = Arc::new(transport);
        Ok(Self {
            api: StravaApi::new(Arc::clone(&transport), api_base_url)?,
            refresher: TokenRefresher::new(transport, oauth_token_url),
            policy,
        })
    }

    pub fn from_config(transport: T, cfg: &StravartConfig) -> anyhow::Result<Self> {
        let policy = RetryPolicy::from_config(&cfg.retry_or_default())?;
        Self::new(transport, &cfg.api_base_url, &cfg.oauth_token_url, policy)
    }

    /// Fetch one activity by id.
    ///
    /// `creds` is never modified. A token refreshed during the fetch is used
    /// by every later attempt of the same fetch and then dropped.
    pub async fn fetch_activity(
        &self,
        activity_id: &str,
        creds: &Credentials,
        validator: Option<&dyn Validator>,
    ) -> Result<Activity, ActivityError> {
        let session = FetchSession::new(creds);
        let session = &session;
        run_with_retry(&self.policy, move || {
            self.fetch_activity_once(activity_id, session, validator)
        })
        .await
    }

    /// Fetch one page of the athlete's activities.
    pub async fn fetch_activities(
        &self,
        creds: &Credentials,
        query: &ListQuery,
    ) -> Result<Vec<Activity>, ActivityError> {
        let session = FetchSession::new(creds);
        let session = &session;
        run_with_retry(&self.policy, move || async move {
            let body = self.call_with_recovery(ApiCall::List(*query), session).await?;
            transform_activities(&body)
        })
        .await
    }

    async fn fetch_activity_once(
        &self,
        activity_id: &str,
        session: &FetchSession,
        validator: Option<&dyn Validator>,
    ) -> Result<Activity, ActivityError> {
        let id = validate_activity_id(activity_id)?;
        let body = self.call_with_recovery(ApiCall::Activity(id), session).await?;
        let activity = transform_activity(&body)?;
        if let Some(validator) = validator {
            check_validation(validator, &activity)?;
        }
        tracing::debug!("fetched activity {} ({})", activity.id, activity.sport_type);
        Ok(activity)
    }

    /// One API call with rate-limit waiting and a single refresh-and-retry on 401.
    async fn call_with_recovery(
        &self,
        call: ApiCall,
        session: &FetchSession,
    ) -> Result<Vec<u8>, ActivityError> {
        let creds = session.current();
        let failure = match self.send(call, &creds.access_token).await {
            Ok(body) => return Ok(body),
            Err(failure) => failure,
        };

        match failure.error.code() {
            ErrorCode::RateLimited => Err(absorb_rate_limit(failure).await),
            ErrorCode::Unauthorized if creds.can_refresh() => {
                let refreshed = match self.refresher.refresh(&creds).await {
                    Ok(token) => token,
                    Err(refresh_err) => {
                        tracing::warn!("token refresh failed: {}", refresh_err);
                        return Err(failure.error);
                    }
                };
                if refreshed.refresh_token.is_some() {
                    tracing::info!("refresh token was rotated; the caller should persist it");
                }
                let refreshed_creds = creds.with_refreshed(&refreshed);
                let access_token = refreshed_creds.access_token.clone();
                session.replace(refreshed_creds);
                match self.send(call, &access_token).await {
                    Ok(body) => Ok(body),
                    Err(retry_failure) if retry_failure.error.code() == ErrorCode::RateLimited => {
                        Err(absorb_rate_limit(retry_failure).await)
                    }
                    Err(retry_failure) => Err(retry_failure.error),
                }
            }
            _ => Err(failure.error),
        }
    }

    async fn send(&self, call: ApiCall, access_token: &str) -> Result<Vec<u8>, ApiFailure> {
        match call {
            ApiCall::Activity(id) => self.api.get_activity(id, access_token).await,
            ApiCall::List(query) => self.api.list_activities(access_token, &query).await,
        }
    }
}

/// Wait as the rate-limit headers ask, then hand the error back for the retry loop.
async fn absorb_rate_limit(failure: ApiFailure) -> ActivityError {
    wait_for_rate_limit(&failure.rate_limit.unwrap_or_default()).await;
    failure.error
}

fn check_validation(validator: &dyn Validator, activity: &Activity) -> Result<(), ActivityError> {
    let result = validator.validate(activity);
    if result.valid {
        for warning in &result.errors {
            tracing::warn!("activity {}: {}", activity.id, warning);
        }
        return Ok(());
    }
    let message = if result.errors.is_empty() {
        "Activity validation failed".to_string()
    } else {
        result.errors.join(", ")
    };
    Err(ActivityError::new(ErrorCode::ValidationFailed, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::scripted::ScriptedTransport;
    use crate::http::HttpResponse;
    use crate::validate::{ActivityGuardrails, ValidationResult};
    use std::time::Duration;
    use tokio::time::Instant;

    const API: &str = "https://www.strava.com/api/v3";
    const TOKEN: &str = "https://www.strava.com/oauth/token";
    const ACTIVITY_JSON: &str =
        r#"{"id":123,"type":"Run","sport_type":"Run","distance":10000,"moving_time":3000}"#;

    fn fetcher(max_retries: u32) -> (Arc<ScriptedTransport>, ActivityFetcher<Arc<ScriptedTransport>>) {
        let transport = Arc::new(ScriptedTransport::new());
        let policy = RetryPolicy::new(
            max_retries,
            Duration::from_millis(1000),
            Duration::from_millis(8000),
        )
        .unwrap();
        let fetcher = ActivityFetcher::new(Arc::clone(&transport), API, TOKEN, policy).unwrap();
        (transport, fetcher)
    }

    fn refreshable() -> Credentials {
        Credentials::new("expired").with_refresh("r", "c", "s")
    }

    #[tokio::test(start_paused = true)]
    async fn returns_transformed_activity() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(200, ACTIVITY_JSON);
        let a = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap();
        assert_eq!(a.id, 123);
        assert_eq!(a.distance, Some(10000.0));
        assert_eq!(transport.count("/activities/123"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_id_makes_no_request() {
        let (transport, fetcher) = fetcher(3);
        let err = fetcher
            .fetch_activity("abc", &Credentials::new("ok"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidId);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_on_401_and_retries_with_new_token() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, r#"{"message":"Authorization Error"}"#)
            .respond_json(200, r#"{"access_token":"fresh","refresh_token":"r2"}"#)
            .respond_json(200, ACTIVITY_JSON);

        let creds = refreshable();
        let a = fetcher.fetch_activity("123", &creds, None).await.unwrap();
        assert_eq!(a.id, 123);
        assert_eq!(transport.count("/activities/123"), 2);
        assert_eq!(transport.count("/oauth/token"), 1);

        let requests = transport.requests();
        assert_eq!(requests[0].header_value("Authorization"), Some("Bearer expired"));
        assert_eq!(requests[2].header_value("Authorization"), Some("Bearer fresh"));
        assert_eq!(creds.access_token, "expired");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_surfaces_first_401() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(400, r#"{"message":"Bad Request"}"#);

        let err = fetcher
            .fetch_activity("123", &refreshable(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(
            err.message(),
            "Authentication failed. Token may be expired or invalid."
        );
        assert_eq!(transport.count("/activities/123"), 1);
        assert_eq!(transport.count("/oauth/token"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_without_refresh_credentials_fails_fast() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(401, "{}");
        let err = fetcher
            .fetch_activity("123", &Credentials::new("expired"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_401_after_refresh_is_not_refreshed_again() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh"}"#)
            .respond_json(401, "{}");
        let err = fetcher
            .fetch_activity("123", &refreshable(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(transport.count("/oauth/token"), 1);
        assert_eq!(transport.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refreshed_token_survives_a_retried_attempt() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh","refresh_token":"r2"}"#)
            .respond_json(500, "{}")
            .respond_json(200, ACTIVITY_JSON);

        let creds = refreshable();
        let a = fetcher.fetch_activity("123", &creds, None).await.unwrap();
        assert_eq!(a.id, 123);
        assert_eq!(transport.count("/oauth/token"), 1);
        assert_eq!(transport.count("/activities/123"), 3);

        let requests = transport.requests();
        assert_eq!(requests[2].header_value("Authorization"), Some("Bearer fresh"));
        assert_eq!(requests[3].header_value("Authorization"), Some("Bearer fresh"));
        assert_eq!(creds.access_token, "expired");
        assert_eq!(creds.refresh_token.as_deref(), Some("r"));
    }

    #[tokio::test(start_paused = true)]
    async fn later_refresh_uses_rotated_refresh_token() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh","refresh_token":"r2"}"#)
            .respond_json(500, "{}")
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresher"}"#)
            .respond_json(200, ACTIVITY_JSON);

        let a = fetcher
            .fetch_activity("123", &refreshable(), None)
            .await
            .unwrap();
        assert_eq!(a.id, 123);

        let requests = transport.requests();
        let refresh_bodies: Vec<String> = requests
            .iter()
            .filter(|r| r.url.contains("/oauth/token"))
            .map(|r| String::from_utf8(r.body.clone().unwrap()).unwrap())
            .collect();
        assert_eq!(refresh_bodies.len(), 2);
        assert!(refresh_bodies[0].ends_with("refresh_token=r"));
        assert!(refresh_bodies[1].ends_with("refresh_token=r2"));
        assert_eq!(
            requests.last().unwrap().header_value("Authorization"),
            Some("Bearer fresher")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_activities_keeps_refreshed_token_across_attempts() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh"}"#)
            .respond_json(503, "{}")
            .respond_json(200, "[]");
        let list = fetcher
            .fetch_activities(&refreshable(), &ListQuery::default())
            .await
            .unwrap();
        assert!(list.is_empty());
        assert_eq!(transport.count("/oauth/token"), 1);
        let requests = transport.requests();
        assert_eq!(requests[3].header_value("Authorization"), Some("Bearer fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_after_refresh_waits_before_retry() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh"}"#)
            .respond(HttpResponse::new(429).with_header("Retry-After", "2"))
            .respond_json(200, ACTIVITY_JSON);

        let start = Instant::now();
        let a = fetcher
            .fetch_activity("123", &refreshable(), None)
            .await
            .unwrap();
        assert_eq!(a.id, 123);
        // 2s rate-limit wait + 1s first backoff.
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
        assert_eq!(transport.count("/oauth/token"), 1);
        assert_eq!(transport.count("/activities/123"), 3);
        let requests = transport.requests();
        assert_eq!(requests[3].header_value("Authorization"), Some("Bearer fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_waits_then_retries_whole_sequence() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond(HttpResponse::new(429).with_header("Retry-After", "2"))
            .respond_json(200, ACTIVITY_JSON);

        let start = Instant::now();
        let a = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap();
        assert_eq!(a.id, 123);
        // 2s rate-limit wait + 1s first backoff.
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
        assert_eq!(transport.count("/activities/123"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_without_headers_waits_default() {
        let (transport, fetcher) = fetcher(1);
        transport
            .respond(HttpResponse::new(429))
            .respond(HttpResponse::new(429));
        let start = Instant::now();
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RateLimited);
        // Two 60s waits plus one 1s backoff.
        assert_eq!(start.elapsed(), Duration::from_secs(121));
    }

    #[tokio::test(start_paused = true)]
    async fn server_errors_are_retried_until_exhausted() {
        let (transport, fetcher) = fetcher(2);
        transport
            .respond_json(500, "{}")
            .respond_json(502, "{}")
            .respond_json(503, "{}");
        let start = Instant::now();
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServerError);
        assert_eq!(err.http_status(), 500);
        assert_eq!(transport.count("/activities/123"), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn network_error_then_success() {
        let (transport, fetcher) = fetcher(3);
        transport.fail("connection refused").respond_json(200, ACTIVITY_JSON);
        let a = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap();
        assert_eq!(a.id, 123);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_not_retried() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(404, "{}");
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.http_status(), 404);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_body_is_terminal() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(200, r#"{"id":123}"#);
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedResponse);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn validator_failure_joins_messages() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(
            200,
            r#"{"id":123,"type":"Run","sport_type":"Run","distance":-1,"total_elevation_gain":-5}"#,
        );
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), Some(&ActivityGuardrails))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(!err.retryable());
        assert_eq!(
            err.message(),
            "Distance must be greater than 0, Elevation gain must be non-negative"
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn validator_without_messages_uses_default_text() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(200, ACTIVITY_JSON);
        let reject = |_: &Activity| ValidationResult::invalid(Vec::new());
        let err = fetcher
            .fetch_activity("123", &Credentials::new("ok"), Some(&reject))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Activity validation failed");
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_activities_refreshes_and_maps_list() {
        let (transport, fetcher) = fetcher(3);
        transport
            .respond_json(401, "{}")
            .respond_json(200, r#"{"access_token":"fresh"}"#)
            .respond_json(
                200,
                r#"[{"id":1,"type":"Run","sport_type":"Run"},{"id":2,"type":"Ride","sport_type":"GravelRide"}]"#,
            );
        let list = fetcher
            .fetch_activities(&refreshable(), &ListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].sport_type, "GravelRide");
        assert_eq!(transport.count("/athlete/activities"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_activities_rejects_non_array() {
        let (transport, fetcher) = fetcher(3);
        transport.respond_json(200, r#"{"id":1}"#);
        let err = fetcher
            .fetch_activities(&Credentials::new("ok"), &ListQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedResponse);
    }
}
