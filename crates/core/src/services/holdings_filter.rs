use crate::models::holding::HoldingRecord;

/// Share-count window applied before valuation.
///
/// Both bounds are exclusive: a holding is kept only if
/// `shares > min_shares_exclusive` and `shares < max_shares_exclusive`.
/// An absent bound does not filter on that side.
///
/// Pure business logic, no I/O. Order of surviving holdings is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldingsFilter {
    pub min_shares_exclusive: Option<i64>,
    pub max_shares_exclusive: Option<i64>,
}

impl HoldingsFilter {
    pub fn new(min_shares_exclusive: Option<i64>, max_shares_exclusive: Option<i64>) -> Self {
        Self {
            min_shares_exclusive,
            max_shares_exclusive,
        }
    }

    /// Whether a holding with `shares` shares falls inside the window.
    pub fn admits(&self, shares: i64) -> bool {
        if self.min_shares_exclusive.is_some_and(|min| shares <= min) {
            return false;
        }
        if self.max_shares_exclusive.is_some_and(|max| shares >= max) {
            return false;
        }
        true
    }

    /// Keep the holdings inside the window. A record without `shares` is
    /// compared as 0; if it survives, the calculator rejects it later.
    pub fn apply(&self, holdings: Vec<HoldingRecord>) -> Vec<HoldingRecord> {
        holdings
            .into_iter()
            .filter(|h| self.admits(h.share_count()))
            .collect()
    }
}

/// Shorthand for `HoldingsFilter::new(min, max).apply(holdings)`.
pub fn filter(
    holdings: Vec<HoldingRecord>,
    min_shares_exclusive: Option<i64>,
    max_shares_exclusive: Option<i64>,
) -> Vec<HoldingRecord> {
    HoldingsFilter::new(min_shares_exclusive, max_shares_exclusive).apply(holdings)
}
