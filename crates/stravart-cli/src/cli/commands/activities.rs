//! `stravart activities` – list one page of the athlete's activities.

use anyhow::Result;
use stravart_core::activity::ListQuery;
use stravart_core::auth::Credentials;
use stravart_core::config::StravartConfig;

use super::activity::format_duration;

pub async fn run_activities(
    cfg: &StravartConfig,
    creds: &Credentials,
    page: u32,
    per_page: u32,
    json: bool,
) -> Result<()> {
    let query = ListQuery {
        page,
        per_page,
        ..ListQuery::default()
    };
    let activities = super::fetcher(cfg)?.fetch_activities(creds, &query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
    } else if activities.is_empty() {
        println!("No activities on page {}.", page);
    } else {
        println!(
            "{:<12} {:<16} {:>9} {:>9} {}",
            "ID", "TYPE", "KM", "TIME", "NAME"
        );
        for a in activities {
            let km = a
                .distance
                .map(|d| format!("{:.2}", d / 1000.0))
                .unwrap_or_else(|| "-".to_string());
            let time = a
                .moving_time
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<12} {:<16} {:>9} {:>9} {}",
                a.id,
                a.sport_type,
                km,
                time,
                a.name.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}
