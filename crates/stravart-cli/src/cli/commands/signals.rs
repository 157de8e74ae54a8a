//! `stravart signals <id>` – print the categorical signals for an activity.

use anyhow::Result;
use stravart_core::auth::Credentials;
use stravart_core::config::StravartConfig;
use stravart_core::signals::get_activity_signals;
use stravart_core::validate::ActivityGuardrails;

pub async fn run_signals(cfg: &StravartConfig, creds: &Credentials, id: &str) -> Result<()> {
    let activity = super::fetcher(cfg)?
        .fetch_activity(id, creds, Some(&ActivityGuardrails))
        .await?;
    let signals = get_activity_signals(&activity)?;
    println!("{}", serde_json::to_string_pretty(&signals)?);
    Ok(())
}
