use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::traits::PriceProvider;
use crate::errors::CoreError;

/// Yahoo Finance provider for live stock prices.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the `yahoo_finance_api` crate. The latest daily close is taken as
/// the current price, in the stock's native currency.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Decimal, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: format!("latest quote lookup failed: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::PriceUnavailable {
            symbol: symbol.to_string(),
            reason: format!("no quote data: {e}"),
        })?;

        Decimal::from_f64(quote.close).ok_or_else(|| CoreError::Api {
            provider: self.name().into(),
            message: format!("Invalid price for {symbol}: {}", quote.close),
        })
    }
}
