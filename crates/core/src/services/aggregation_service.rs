use chrono::Utc;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use super::gains_calculator::GainsCalculator;
use super::holdings_filter::HoldingsFilter;
use super::price_service::PriceService;
use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingRecord};
use crate::models::price::PriceQuote;
use crate::models::valuation::{
    round_money, PortfolioAggregate, PortfolioValuation, ReconciliationReport, StockValue,
};
use crate::store::traits::HoldingsStore;

/// Whether a freshly computed portfolio value agrees with a reported one
/// within ±3%: `reported × 0.97 ≤ computed ≤ reported × 1.03`.
pub fn within_tolerance(computed: Decimal, reported: Decimal) -> bool {
    ReconciliationReport::new(reported, computed).within_tolerance
}

/// Orchestrates valuation over the holdings store.
///
/// Every operation works on one snapshot fetched for that call and keeps no
/// state between calls. A batch either values every holding it contains or
/// fails as a whole: the first malformed record, unresolved price or
/// arithmetic failure aborts it, and no partial total is ever returned.
pub struct AggregationEngine {
    store: Arc<dyn HoldingsStore>,
    prices: PriceService,
    calculator: GainsCalculator,
}

impl AggregationEngine {
    pub fn new(store: Arc<dyn HoldingsStore>, prices: PriceService) -> Self {
        Self {
            store,
            prices,
            calculator: GainsCalculator::new(),
        }
    }

    /// Total capital gain over the holdings whose share count lies strictly
    /// between the two bounds, rounded to 2 decimal places. An empty batch
    /// totals `0.00`.
    pub async fn total_capital_gain(
        &self,
        min_shares_exclusive: Option<i64>,
        max_shares_exclusive: Option<i64>,
    ) -> Result<Decimal, CoreError> {
        let aggregate = self
            .capital_gains(min_shares_exclusive, max_shares_exclusive)
            .await?;
        Ok(aggregate.total_capital_gain)
    }

    /// Same pipeline as [`Self::total_capital_gain`], keeping the per-holding
    /// breakdown.
    #[instrument(skip(self))]
    pub async fn capital_gains(
        &self,
        min_shares_exclusive: Option<i64>,
        max_shares_exclusive: Option<i64>,
    ) -> Result<PortfolioAggregate, CoreError> {
        let records = self.store.fetch_holdings().await?;
        let fetched = records.len();
        let filtered =
            HoldingsFilter::new(min_shares_exclusive, max_shares_exclusive).apply(records);
        tracing::debug!(fetched, retained = filtered.len(), "filtered holdings");

        self.aggregate(&filtered).await.inspect_err(|e| {
            tracing::warn!(error = %e, "capital gains batch aborted");
        })
    }

    /// Value an already fetched batch of holdings.
    ///
    /// Every record is validated before the first price lookup, so a
    /// malformed record fails the batch without any outbound call. Price
    /// lookups for distinct holdings then run concurrently and are joined
    /// before summing; the first failure cancels the rest.
    pub async fn aggregate(&self, records: &[HoldingRecord]) -> Result<PortfolioAggregate, CoreError> {
        let holdings = records
            .iter()
            .map(HoldingRecord::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let quotes = try_join_all(holdings.iter().map(|h| self.resolve_for(h))).await?;

        let results = holdings
            .iter()
            .zip(quotes)
            .map(|(holding, quote)| self.calculator.compute_holding(holding, quote.price))
            .collect::<Result<Vec<_>, _>>()?;

        PortfolioAggregate::from_results(results)
    }

    /// Sum of stock values over every given holding (no filtering), rounded
    /// to 2 decimal places.
    ///
    /// Takes no lock and may run while the store is being written to: the
    /// answer can be momentarily stale, and [`within_tolerance`] is what
    /// absorbs that staleness when it is compared with a reported value.
    pub async fn reconcile_portfolio_value(
        &self,
        records: &[HoldingRecord],
    ) -> Result<Decimal, CoreError> {
        Ok(self.aggregate(records).await?.total_stock_value)
    }

    /// Current value of the whole store, stamped with today's date.
    #[instrument(skip(self))]
    pub async fn portfolio_value(&self) -> Result<PortfolioValuation, CoreError> {
        let records = self.store.fetch_holdings().await?;
        let portfolio_value = self.reconcile_portfolio_value(&records).await?;
        Ok(PortfolioValuation {
            date: Utc::now().date_naive(),
            portfolio_value,
        })
    }

    /// Current value of a single holding.
    #[instrument(skip(self))]
    pub async fn stock_value(&self, id: &str) -> Result<StockValue, CoreError> {
        let holding = self.store.fetch_holding(id).await?.validate()?;
        let quote = self.resolve_for(&holding).await?;
        let result = self.calculator.compute_holding(&holding, quote.price)?;
        Ok(StockValue {
            symbol: holding.symbol,
            ticker_price: quote.price,
            stock_value: round_money(result.stock_value),
        })
    }

    /// Compare a previously reported portfolio value against a fresh
    /// snapshot of the store.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, reported: Decimal) -> Result<ReconciliationReport, CoreError> {
        let records = self.store.fetch_holdings().await?;
        let computed = self.reconcile_portfolio_value(&records).await?;
        let report = ReconciliationReport::new(reported, computed);
        if !report.within_tolerance {
            tracing::warn!(
                %reported,
                %computed,
                "portfolio value outside reconciliation tolerance"
            );
        }
        Ok(report)
    }

    async fn resolve_for(&self, holding: &Holding) -> Result<PriceQuote, CoreError> {
        self.prices
            .resolve(&holding.symbol)
            .await
            .map_err(|e| CoreError::CalculationError {
                holding: holding.label(),
                source: Box::new(e),
            })
    }
}
