use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::holding::HoldingRecord;

/// Gateway to the external holdings store.
///
/// An implementation may fan out over several interchangeable replicas; the
/// caller treats whichever one answered as authoritative for that call and
/// never assumes two calls see the same snapshot.
#[async_trait]
pub trait HoldingsStore: Send + Sync {
    /// Fetch every holding, in store order.
    ///
    /// Fails with [`CoreError::UpstreamUnavailable`] if the store cannot be
    /// reached or answers with a non-success status, and with
    /// [`CoreError::UpstreamDataInvalid`] if the payload is not a list of
    /// holding-shaped records.
    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError>;

    /// Fetch a single holding by its store identifier.
    async fn fetch_holding(&self, id: &str) -> Result<HoldingRecord, CoreError>;
}
