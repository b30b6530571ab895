use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use super::holding::PURCHASE_DATE_FORMAT;
use crate::errors::CoreError;

/// Number of decimal places for every monetary figure the core returns.
pub const MONEY_DP: u32 = 2;

/// Relative tolerance when comparing a freshly computed portfolio value with
/// a previously reported one (±3%). Absorbs replica staleness in the
/// holdings store; the arithmetic itself is exact.
pub const RECONCILIATION_TOLERANCE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// Round a monetary amount to 2 decimal places using round-half-to-even
/// (banker's rounding): `0.125 → 0.12`, `0.135 → 0.14`.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Valuation of a single holding against a current price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainResult {
    /// Label of the holding (store id, else symbol)
    pub holding: String,

    pub symbol: String,

    /// `shares × current price`, unrounded
    #[serde(with = "rust_decimal::serde::float")]
    pub stock_value: Decimal,

    /// `stock value − shares × purchase price`, rounded to 2 dp
    #[serde(with = "rust_decimal::serde::float")]
    pub capital_gain: Decimal,
}

/// Totals over one batch of holdings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAggregate {
    /// Sum of per-holding capital gains, rounded to 2 dp
    #[serde(with = "rust_decimal::serde::float")]
    pub total_capital_gain: Decimal,

    /// Sum of per-holding stock values, rounded to 2 dp
    #[serde(with = "rust_decimal::serde::float")]
    pub total_stock_value: Decimal,

    /// Per-holding breakdown, in store order
    pub holdings: Vec<GainResult>,
}

impl PortfolioAggregate {
    /// Sum a set of per-holding results. An empty batch totals `0.00`.
    ///
    /// Fails with [`CoreError::Arithmetic`] when a total is not representable.
    pub fn from_results(holdings: Vec<GainResult>) -> Result<Self, CoreError> {
        let total_capital_gain = round_money(checked_total(&holdings, |g| g.capital_gain)?);
        let total_stock_value = round_money(checked_total(&holdings, |g| g.stock_value)?);
        Ok(Self {
            total_capital_gain,
            total_stock_value,
            holdings,
        })
    }
}

fn checked_total(
    holdings: &[GainResult],
    field: impl Fn(&GainResult) -> Decimal,
) -> Result<Decimal, CoreError> {
    holdings.iter().try_fold(Decimal::ZERO, |acc, g| {
        let value = field(g);
        acc.checked_add(value).ok_or_else(|| {
            CoreError::Arithmetic(format!("batch total {acc} + {value} ({})", g.holding))
        })
    })
}

/// The aggregate value of every holding in the store on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    #[serde(serialize_with = "serialize_report_date")]
    pub date: NaiveDate,

    #[serde(rename = "portfolio value", with = "rust_decimal::serde::float")]
    pub portfolio_value: Decimal,
}

/// Current value of one holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockValue {
    pub symbol: String,

    /// Current price per share
    #[serde(rename = "ticker", with = "rust_decimal::serde::float")]
    pub ticker_price: Decimal,

    #[serde(rename = "stock value", with = "rust_decimal::serde::float")]
    pub stock_value: Decimal,
}

/// Outcome of comparing a reported portfolio value against a fresh sum of
/// per-holding stock values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    #[serde(with = "rust_decimal::serde::float")]
    pub reported: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub computed: Decimal,

    /// `reported × 0.97`
    #[serde(with = "rust_decimal::serde::float")]
    pub lower_bound: Decimal,

    /// `reported × 1.03`
    #[serde(with = "rust_decimal::serde::float")]
    pub upper_bound: Decimal,

    pub within_tolerance: bool,
}

impl ReconciliationReport {
    pub fn new(reported: Decimal, computed: Decimal) -> Self {
        let lower_bound = reported * (Decimal::ONE - RECONCILIATION_TOLERANCE);
        let upper_bound = reported * (Decimal::ONE + RECONCILIATION_TOLERANCE);
        Self {
            reported,
            computed,
            lower_bound,
            upper_bound,
            within_tolerance: lower_bound <= computed && computed <= upper_bound,
        }
    }
}

fn serialize_report_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(PURCHASE_DATE_FORMAT).to_string())
}
