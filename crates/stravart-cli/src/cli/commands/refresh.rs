//! `stravart refresh` – exchange the refresh token for a new access token.
//!
//! The new tokens are printed, not written back to config.toml.

use anyhow::Result;
use stravart_core::auth::{Credentials, TokenRefresher};
use stravart_core::config::{CredentialsConfig, StravartConfig};
use stravart_core::http::CurlTransport;

pub async fn run_refresh(cfg: &StravartConfig, merged: CredentialsConfig) -> Result<()> {
    let creds = Credentials {
        access_token: merged.access_token.unwrap_or_default(),
        refresh_token: merged.refresh_token,
        client_id: merged.client_id,
        client_secret: merged.client_secret,
    };
    let transport = CurlTransport::from_config(&cfg.http_or_default());
    let refreshed = TokenRefresher::new(transport, cfg.oauth_token_url.as_str())
        .refresh(&creds)
        .await?;

    println!("access_token = \"{}\"", refreshed.access_token);
    match &refreshed.refresh_token {
        Some(rotated) => println!("refresh_token = \"{}\"", rotated),
        None => println!("# refresh token unchanged"),
    }
    if let Some(expires_at) = refreshed.expires_at {
        println!("# expires_at = {}", expires_at);
    }
    Ok(())
}
