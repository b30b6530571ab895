use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::traits::PriceProvider;
use crate::errors::CoreError;

const BASE_URL: &str = "https://api.api-ninjas.com/v1/stockprice";

/// API Ninjas stock price provider.
///
/// - **Requires**: API key, sent in the `X-Api-Key` header.
/// - **Coverage**: US-listed equities.
/// - **Unknown tickers** come back as an empty JSON object or array, which is
///   reported as [`CoreError::PriceUnavailable`].
pub struct ApiNinjasProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ApiNinjasProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the provider at a different endpoint (used by tests and
    /// self-hosted mirrors).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }
}

// ── API Ninjas response types ───────────────────────────────────────

#[derive(Deserialize)]
struct StockPriceResponse {
    price: Option<Decimal>,
}

#[async_trait]
impl PriceProvider for ApiNinjasProvider {
    fn name(&self) -> &str {
        "API Ninjas"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Decimal, CoreError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ticker", symbol.to_uppercase())])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: self.name().into(),
                message: format!("Price lookup for {symbol} returned {status}"),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| CoreError::Api {
            provider: self.name().into(),
            message: format!("Failed to parse quote for {symbol}: {e}"),
        })?;

        if !body.is_object() {
            return Err(CoreError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: "no quote returned".into(),
            });
        }

        let quote: StockPriceResponse =
            serde_json::from_value(body).map_err(|e| CoreError::Api {
                provider: self.name().into(),
                message: format!("Invalid price format for {symbol}: {e}"),
            })?;

        quote.price.ok_or_else(|| CoreError::PriceUnavailable {
            symbol: symbol.to_string(),
            reason: "no quote returned".into(),
        })
    }
}
