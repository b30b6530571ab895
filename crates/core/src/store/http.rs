use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::payload::{decode_holding, decode_holdings};
use super::traits::HoldingsStore;
use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Holdings store reached over HTTP.
///
/// Holds one or more replica base URLs (e.g. `http://stocks1:8000`) and
/// spreads calls over them round-robin. Picking a replica is a single atomic
/// increment, so concurrent requests never contend on a lock. Replicas may be
/// briefly behind each other; callers absorb that through the
/// reconciliation tolerance instead of pinning a replica.
pub struct HttpHoldingsStore {
    client: Client,
    replicas: Vec<String>,
    cursor: AtomicUsize,
}

impl HttpHoldingsStore {
    pub fn new(replicas: Vec<String>) -> Result<Self, CoreError> {
        Self::with_timeout(replicas, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(replicas: Vec<String>, timeout: Duration) -> Result<Self, CoreError> {
        let replicas: Vec<String> = replicas
            .into_iter()
            .map(|r| r.trim().trim_end_matches('/').to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if replicas.is_empty() {
            return Err(CoreError::Configuration(
                "at least one holdings service URL is required".into(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            replicas,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Configured replica base URLs, in rotation order.
    pub fn replicas(&self) -> &[String] {
        &self.replicas
    }

    fn next_replica(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
        &self.replicas[index]
    }

    async fn get(&self, path: &str) -> Result<(String, reqwest::Response), CoreError> {
        let base = self.next_replica();
        let url = format!("{base}{path}");
        tracing::debug!(%url, "fetching from holdings service");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(replica = %base, error = %e, "holdings service unreachable");
            CoreError::UpstreamUnavailable(format!("{base}: {}", CoreError::from(e)))
        })?;
        Ok((base.to_string(), response))
    }
}

#[async_trait]
impl HoldingsStore for HttpHoldingsStore {
    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        let (base, response) = self.get("/stocks").await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(replica = %base, %status, "holdings service returned an error status");
            return Err(CoreError::UpstreamUnavailable(format!(
                "Failed to fetch data from stocks service ({base} returned {status})"
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            CoreError::UpstreamDataInvalid(format!("{base} returned a non-JSON body: {e}"))
        })?;

        let records = decode_holdings(payload)?;
        tracing::debug!(replica = %base, count = records.len(), "fetched holdings snapshot");
        Ok(records)
    }

    async fn fetch_holding(&self, id: &str) -> Result<HoldingRecord, CoreError> {
        let (base, response) = self.get(&format!("/stocks/{id}")).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::HoldingNotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(CoreError::UpstreamUnavailable(format!(
                "Failed to fetch stock {id} from stocks service ({base} returned {status})"
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            CoreError::UpstreamDataInvalid(format!("{base} returned a non-JSON body: {e}"))
        })?;

        decode_holding(payload, id)
    }
}
