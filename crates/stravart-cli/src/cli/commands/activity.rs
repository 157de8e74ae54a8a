//! `stravart activity <id>` – fetch and print one activity.

use anyhow::Result;
use stravart_core::activity::Activity;
use stravart_core::auth::Credentials;
use stravart_core::config::StravartConfig;
use stravart_core::validate::ActivityGuardrails;

pub async fn run_activity(
    cfg: &StravartConfig,
    creds: &Credentials,
    id: &str,
    json: bool,
) -> Result<()> {
    let activity = super::fetcher(cfg)?
        .fetch_activity(id, creds, Some(&ActivityGuardrails))
        .await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&activity)?);
    } else {
        print_summary(&activity);
    }
    Ok(())
}

fn print_summary(a: &Activity) {
    println!("{:<14} {}", "id", a.id);
    println!("{:<14} {} ({})", "type", a.sport_type, a.activity_type);
    if let Some(name) = &a.name {
        println!("{:<14} {}", "name", name);
    }
    if let Some(d) = a.distance {
        println!("{:<14} {:.2} km", "distance", d / 1000.0);
    }
    if let Some(t) = a.moving_time {
        println!("{:<14} {}", "moving time", format_duration(t));
    }
    if let Some(e) = a.elevation_gain {
        println!("{:<14} {:.0} m", "elevation", e);
    }
    if let Some(start) = &a.start_date_local {
        println!("{:<14} {}", "start (local)", start);
    }
    if let Some(gear) = &a.gear {
        println!("{:<14} {}", "gear", gear);
    }
}

/// `h:mm:ss`, or `m:ss` under an hour.
pub(super) fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
