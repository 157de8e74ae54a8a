//! Exchange a refresh token for a new access token.

use super::credentials::{Credentials, RefreshedToken};
use crate::error::ActivityError;
use crate::http::{HttpRequest, Transport};
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<u64>,
}

/// Calls the OAuth token endpoint with `grant_type=refresh_token`.
///
/// Makes at most one request per call and never retries.
pub struct TokenRefresher<T> {
    transport: T,
    token_url: String,
}

impl<T: Transport> TokenRefresher<T> {
    pub fn new(transport: T, token_url: impl Into<String>) -> Self {
        Self {
            transport,
            token_url: token_url.into(),
        }
    }

    pub async fn refresh(&self, creds: &Credentials) -> Result<RefreshedToken, ActivityError> {
        let refresh_token = creds
            .refresh_token
            .as_deref()
            .ok_or_else(|| ActivityError::unauthorized("Refresh token is not available"))?;
        let (client_id, client_secret) = match (&creds.client_id, &creds.client_secret) {
            (Some(id), Some(secret)) => (id.as_str(), secret.as_str()),
            _ => {
                return Err(ActivityError::unauthorized(
                    "Client ID and client secret are required for token refresh",
                ))
            }
        };

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", client_id)
            .append_pair("client_secret", client_secret)
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token)
            .finish();

        let response = self
            .transport
            .send(HttpRequest::post_form(self.token_url.as_str(), body))
            .await
            .map_err(|e| {
                tracing::debug!("token refresh transport error: {}", e);
                ActivityError::network("Failed to connect to Strava OAuth endpoint")
            })?;

        if !response.is_success() {
            tracing::debug!("token refresh rejected with HTTP {}", response.status);
            return Err(ActivityError::unauthorized("Token refresh failed"));
        }

        let parsed: TokenResponse = serde_json::from_slice(&response.body).map_err(|_| {
            ActivityError::malformed("Invalid response format from token refresh endpoint")
        })?;
        let access_token = parsed.access_token.ok_or_else(|| {
            ActivityError::malformed("Access token not found in refresh response")
        })?;

        tracing::info!("access token refreshed");
        Ok(RefreshedToken {
            access_token,
            refresh_token: parsed.refresh_token,
            expires_at: parsed.expires_at,
        })
    }
}
