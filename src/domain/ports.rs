use crate::domain::model::{RouteSummary, SentMessage, TransitSubMode, TravelMode};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;

/// One routing request as passed to the external provider.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    pub arrival: Option<DateTime<Utc>>,
    pub waypoints: Vec<String>,
    pub transit_modes: Vec<TransitSubMode>,
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn fetch_route(&self, query: &RouteQuery) -> Result<RouteSummary>;
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, channel: &str, text: &str, reply_to: Option<i64>)
        -> Result<SentMessage>;
}

/// Append-only ledger of sent messages. Policy-free: threading decisions
/// live in the orchestrator, the store only matches text patterns.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append(&self, message: &SentMessage) -> Result<()>;

    /// Scans the whole log in storage order and returns the first message
    /// whose text (newlines folded to spaces) matches `pattern`.
    async fn find_by_pattern(&self, pattern: &Regex) -> Result<Option<SentMessage>>;
}
