pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use errors::CoreError;
use providers::registry::{build_provider, PriceProviderKind};
use services::aggregation_service::AggregationEngine;
use services::price_service::PriceService;
use store::http::HttpHoldingsStore;

/// Everything needed to wire an [`AggregationEngine`] against live
/// collaborators. Passed in explicitly; the core never reads the environment.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Base URLs of the holdings service replicas
    pub holdings_urls: Vec<String>,
    pub price_provider: PriceProviderKind,
    pub price_api_key: Option<String>,
    /// `SYM=price,...`, only used by the static provider
    pub static_prices: Option<String>,
    /// Upper bound for a single price lookup
    pub price_timeout: Option<Duration>,
    /// Upper bound for a single holdings-service request
    pub holdings_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            holdings_urls: Vec::new(),
            price_provider: PriceProviderKind::ApiNinjas,
            price_api_key: None,
            static_prices: None,
            price_timeout: Some(Duration::from_secs(10)),
            holdings_timeout: Duration::from_secs(30),
        }
    }
}

/// Build an engine backed by the HTTP holdings store and the configured
/// price provider.
pub fn build_engine(settings: &EngineSettings) -> Result<AggregationEngine, CoreError> {
    let store = HttpHoldingsStore::with_timeout(
        settings.holdings_urls.clone(),
        settings.holdings_timeout,
    )?;
    let provider = build_provider(
        settings.price_provider,
        settings.price_api_key.as_deref(),
        settings.static_prices.as_deref(),
    )?;

    let mut prices = PriceService::new(provider);
    if let Some(timeout) = settings.price_timeout {
        prices = prices.with_timeout(timeout);
    }

    tracing::info!(
        replicas = store.replicas().len(),
        provider = prices.provider_name(),
        "valuation engine ready"
    );
    Ok(AggregationEngine::new(Arc::new(store), prices))
}
