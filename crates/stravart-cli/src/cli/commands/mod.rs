//! CLI command handlers, one file per command.

mod activities;
mod activity;
mod completions;
mod refresh;
mod signals;

pub use activities::run_activities;
pub use activity::run_activity;
pub use completions::{run_completions, run_man};
pub use refresh::run_refresh;
pub use signals::run_signals;

use anyhow::Result;
use stravart_core::activity::ActivityFetcher;
use stravart_core::config::StravartConfig;
use stravart_core::http::CurlTransport;

/// Fetcher over libcurl, configured from config.toml.
fn fetcher(cfg: &StravartConfig) -> Result<ActivityFetcher<CurlTransport>> {
    let transport = CurlTransport::from_config(&cfg.http_or_default());
    ActivityFetcher::from_config(transport, cfg)
}
