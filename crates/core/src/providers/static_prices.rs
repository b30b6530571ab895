use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::traits::PriceProvider;
use crate::errors::CoreError;

/// Fixed price table. Used for offline runs and demos where no live price
/// source is reachable.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    prices: HashMap<String, Decimal>,
}

impl StaticPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the price for a symbol (builder style).
    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
        self.prices.insert(symbol.to_uppercase(), price);
        self
    }

    /// Parse a table written as `SYM=price,SYM=price` (whitespace ignored).
    pub fn parse(table: &str) -> Result<Self, CoreError> {
        let mut provider = Self::new();
        for entry in table.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (symbol, price) = entry.split_once('=').ok_or_else(|| {
                CoreError::Configuration(format!("static price entry '{entry}' is not SYM=price"))
            })?;
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(CoreError::Configuration(format!(
                    "static price entry '{entry}' has no symbol"
                )));
            }
            let price = Decimal::from_str(price.trim()).map_err(|e| {
                CoreError::Configuration(format!("static price for {symbol} is not a number: {e}"))
            })?;
            provider = provider.with_price(symbol, price);
        }
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[async_trait]
impl PriceProvider for StaticPriceProvider {
    fn name(&self) -> &str {
        "Static"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<Decimal, CoreError> {
        self.prices
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| CoreError::PriceUnavailable {
                symbol: symbol.to_string(),
                reason: "symbol not in static price table".into(),
            })
    }
}
