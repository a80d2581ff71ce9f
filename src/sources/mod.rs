pub mod api;
pub mod raw;

use async_trait::async_trait;
use crate::models::{LedgerEntry, RiskAlert, Signal, YieldPool};

pub use api::ApiClient;
pub use raw::AssetQuote;

/// Remote dashboard backend. Every call is independent; the orchestrator
/// decides how failures combine.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_prices(&self) -> Result<Vec<AssetQuote>, SourceError>;
    async fn fetch_signals(&self) -> Result<Vec<Signal>, SourceError>;
    async fn fetch_ledger(&self) -> Result<Option<Vec<LedgerEntry>>, SourceError>;
    async fn fetch_pools(&self) -> Result<Vec<YieldPool>, SourceError>;
    async fn fetch_risk_alerts(&self) -> Result<Vec<RiskAlert>, SourceError>;
    /// Ask the backend to run its own sync
    async fn trigger_sync(&self) -> Result<(), SourceError>;
    async fn fetch_report(&self) -> Result<Vec<u8>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
}
