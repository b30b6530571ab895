use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The current unit price of a ticker, as returned by a price provider.
///
/// Quotes are fetched fresh for every valuation and never cached: two
/// lookups for the same symbol may legitimately disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Current price per share (always > 0)
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl PriceQuote {
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            price,
        }
    }
}
