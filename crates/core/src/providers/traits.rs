use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::CoreError;

/// Trait abstraction for live equity price sources.
///
/// Each source (API Ninjas, Yahoo Finance, a static table) implements this
/// trait. The valuation pipeline only ever sees `dyn PriceProvider`, so a
/// source can be swapped without touching the services.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current price per share for `symbol`.
    ///
    /// An unknown symbol must fail with [`CoreError::PriceUnavailable`], never
    /// return a default price. Implementations perform exactly one lookup per
    /// call and do not retry.
    async fn get_current_price(&self, symbol: &str) -> Result<Decimal, CoreError>;
}
