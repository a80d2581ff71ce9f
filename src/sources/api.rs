use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use crate::models::{LedgerEntry, RiskAlert, Signal, YieldPool};
use super::{raw, AssetQuote, DashboardSource, SourceError};

/// HTTP client for the dashboard backend
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client builder failed ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON endpoint
    async fn get_json(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let request = self.client.get(self.url(path))
            .header("Accept", "application/json");
        Self::read_body(request, path).await
    }

    /// Send a request, treating any non-2xx status as an error
    async fn read_body(request: RequestBuilder, path: &str) -> Result<Vec<u8>, SourceError> {
        let resp = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::Status {
                endpoint: path.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let bytes = resp.bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        tracing::trace!("{} -> {} bytes", path, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DashboardSource for ApiClient {
    fn name(&self) -> &'static str {
        "ApiClient"
    }

    async fn fetch_prices(&self) -> Result<Vec<AssetQuote>, SourceError> {
        raw::parse_prices(&self.get_json("/api/harga").await?)
    }

    async fn fetch_signals(&self) -> Result<Vec<Signal>, SourceError> {
        raw::parse_signals(&self.get_json("/api/sinyal").await?)
    }

    async fn fetch_ledger(&self) -> Result<Option<Vec<LedgerEntry>>, SourceError> {
        raw::parse_ledger(&self.get_json("/api/ledger").await?)
    }

    async fn fetch_pools(&self) -> Result<Vec<YieldPool>, SourceError> {
        raw::parse_pools(&self.get_json("/api/ayao").await?)
    }

    async fn fetch_risk_alerts(&self) -> Result<Vec<RiskAlert>, SourceError> {
        raw::parse_risk_alerts(&self.get_json("/api/alerts").await?)
    }

    async fn trigger_sync(&self) -> Result<(), SourceError> {
        Self::read_body(self.client.post(self.url("/api/sync")), "/api/sync").await?;
        Ok(())
    }

    /// Binary download; no JSON `Accept` header
    async fn fetch_report(&self) -> Result<Vec<u8>, SourceError> {
        Self::read_body(self.client.get(self.url("/api/report")), "/api/report").await
    }
}
