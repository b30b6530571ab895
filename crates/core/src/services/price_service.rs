use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::PriceQuote;
use crate::providers::traits::PriceProvider;

/// Resolves the current market price of a ticker.
///
/// Stateless: every call is one lookup against the configured provider, with
/// no caching and no retries. Retry policy, if any, belongs to the caller.
pub struct PriceService {
    provider: Arc<dyn PriceProvider>,
    timeout: Option<Duration>,
}

impl PriceService {
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    /// Bound every lookup by `timeout`. An expired lookup fails with
    /// [`CoreError::PriceUnavailable`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Look up the current price for `symbol`.
    ///
    /// Rejects an empty symbol before any outbound call, and rejects a
    /// provider answer that is not strictly positive.
    pub async fn resolve(&self, symbol: &str) -> Result<PriceQuote, CoreError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CoreError::PriceUnavailable {
                symbol: String::new(),
                reason: "symbol must not be empty".into(),
            });
        }

        let lookup = self.provider.get_current_price(symbol);
        let price = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, lookup).await.map_err(|_| {
                CoreError::PriceUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("lookup timed out after {}ms", limit.as_millis()),
                }
            })??,
            None => lookup.await?,
        };

        if price <= Decimal::ZERO {
            return Err(CoreError::Api {
                provider: self.provider.name().to_string(),
                message: format!("Invalid price returned for {symbol}: {price} (must be positive)"),
            });
        }

        tracing::debug!(symbol, %price, provider = self.provider.name(), "resolved price");
        Ok(PriceQuote::new(symbol, price))
    }
}
