use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingRecord};
use crate::models::valuation::{round_money, GainResult};

/// Values a single holding against a current price.
///
/// - `stock_value  = shares × price`
/// - `cost_basis   = shares × purchase price`
/// - `capital_gain = round(stock_value − cost_basis, 2)`, half-to-even
///
/// Pure: the same holding and price always give the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainsCalculator;

impl GainsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw record and value it.
    ///
    /// Fails with [`CoreError::MalformedHolding`] naming the missing field and
    /// the holding, or with [`CoreError::CalculationError`] for anything else.
    pub fn compute(&self, record: &HoldingRecord, price: Decimal) -> Result<GainResult, CoreError> {
        let holding = record.validate()?;
        self.compute_holding(&holding, price)
    }

    /// Value an already validated holding.
    pub fn compute_holding(&self, holding: &Holding, price: Decimal) -> Result<GainResult, CoreError> {
        let fail = |source: CoreError| CoreError::CalculationError {
            holding: holding.label(),
            source: Box::new(source),
        };

        if price <= Decimal::ZERO {
            return Err(fail(CoreError::PriceUnavailable {
                symbol: holding.symbol.clone(),
                reason: format!("non-positive price {price}"),
            }));
        }

        let shares = Decimal::from(holding.shares);
        let stock_value = shares.checked_mul(price).ok_or_else(|| {
            fail(CoreError::Arithmetic(format!("{shares} × {price}")))
        })?;
        let cost_basis = holding.cost_basis().map_err(fail)?;
        let gain = stock_value.checked_sub(cost_basis).ok_or_else(|| {
            fail(CoreError::Arithmetic(format!("{stock_value} − {cost_basis}")))
        })?;

        Ok(GainResult {
            holding: holding.label(),
            symbol: holding.symbol.clone(),
            stock_value,
            capital_gain: round_money(gain),
        })
    }
}
