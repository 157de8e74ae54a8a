//! CLI for stravart.

mod commands;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use stravart_core::auth::Credentials;
use stravart_core::config::{self, CredentialsConfig, StravartConfig};

use commands::{
    run_activities, run_activity, run_completions, run_man, run_refresh, run_signals,
};

/// Top-level CLI for stravart.
#[derive(Debug, Parser)]
#[command(name = "stravart")]
#[command(about = "Fetch Strava activities and derive illustration signals", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Per-invocation overrides for the `[credentials]` section of config.toml.
#[derive(Debug, Default, Args)]
pub struct CredentialArgs {
    /// Strava access token.
    #[arg(long, global = true, env = "STRAVA_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
    /// Refresh token used when the access token has expired.
    #[arg(long, global = true, env = "STRAVA_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,
    /// OAuth client id.
    #[arg(long, global = true, env = "STRAVA_CLIENT_ID")]
    pub client_id: Option<String>,
    /// OAuth client secret.
    #[arg(long, global = true, env = "STRAVA_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

impl CredentialArgs {
    /// Stored credentials with any non-empty flags layered on top.
    pub fn merge(&self, cfg: &StravartConfig) -> CredentialsConfig {
        let stored = cfg.credentials.clone().unwrap_or_default();
        let pick = |flag: &Option<String>, stored: Option<String>| {
            flag.clone().filter(|v| !v.is_empty()).or(stored)
        };
        CredentialsConfig {
            access_token: pick(&self.access_token, stored.access_token),
            refresh_token: pick(&self.refresh_token, stored.refresh_token),
            client_id: pick(&self.client_id, stored.client_id),
            client_secret: pick(&self.client_secret, stored.client_secret),
        }
    }

    /// Like [`merge`](Self::merge) but an access token is mandatory.
    pub fn resolve(&self, cfg: &StravartConfig) -> Result<Credentials> {
        let merged = self.merge(cfg);
        let Some(access_token) = merged.access_token else {
            bail!("no access token: pass --access-token or set [credentials] access_token in config.toml");
        };
        Ok(Credentials {
            access_token,
            refresh_token: merged.refresh_token,
            client_id: merged.client_id,
            client_secret: merged.client_secret,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch one activity by its Strava ID.
    Activity {
        /// Strava activity ID.
        id: String,
        /// Print the mapped activity as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the athlete's recent activities.
    Activities {
        /// Page number (1-based).
        #[arg(long, default_value_t = 1, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Page size; defaults to `per_page` from config.toml.
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=200))]
        per_page: Option<u32>,
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fetch an activity and print its categorical signals as JSON.
    Signals {
        /// Strava activity ID.
        id: String,
    },

    /// Exchange the refresh token for a new access token.
    Refresh,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // These never touch config or the network.
        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!(
            "loaded config: api={} token_url={}",
            cfg.api_base_url,
            cfg.oauth_token_url
        );

        match cli.command {
            CliCommand::Activity { id, json } => {
                let creds = cli.credentials.resolve(&cfg)?;
                run_activity(&cfg, &creds, &id, json).await?;
            }
            CliCommand::Activities {
                page,
                per_page,
                json,
            } => {
                let creds = cli.credentials.resolve(&cfg)?;
                let per_page = per_page.unwrap_or(cfg.per_page);
                run_activities(&cfg, &creds, page, per_page, json).await?;
            }
            CliCommand::Signals { id } => {
                let creds = cli.credentials.resolve(&cfg)?;
                run_signals(&cfg, &creds, &id).await?;
            }
            CliCommand::Refresh => run_refresh(&cfg, cli.credentials.merge(&cfg)).await?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
