pub mod places;

use crate::utils::error::{NotifierError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "apartment-notifier")]
#[command(about = "Announces new apartment listings with travel-time summaries")]
pub struct CliConfig {
    /// Listing batch handed over by the ingestion side, as JSON.
    #[arg(long)]
    pub batch_file: String,

    /// Destination catalog.
    #[arg(long, default_value = "places.toml")]
    pub places_file: String,

    /// Append-only log of sent messages, used for thread lookups.
    #[arg(long, default_value = "messages.jsonl")]
    pub store_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Secrets come from the environment, never from flags.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub telegram_token: String,
    pub telegram_channel: String,
    pub maps_api_key: String,
    /// Separate chat for pipeline failures, so delivery problems never
    /// stall silently.
    pub operator_channel: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            telegram_token: require_env("TELEGRAM_BOT_TOKEN")?,
            telegram_channel: require_env("TELEGRAM_BOT_CHANNEL")?,
            maps_api_key: require_env("GOOGLE_MAPS_KEY")?,
            operator_channel: std::env::var("TELEGRAM_OPERATOR_CHANNEL").ok(),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NotifierError::ConfigError {
            message: format!("Missing {} env var", name),
        })
}
