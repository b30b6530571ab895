//! Portfolio and single-stock valuation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use capital_gains_core::models::valuation::{PortfolioValuation, StockValue};

use crate::{error::ApiError, AppState};

/// Current value of every holding in the store
pub async fn portfolio_value(
    State(state): State<AppState>,
) -> Result<Json<PortfolioValuation>, ApiError> {
    Ok(Json(state.engine.portfolio_value().await?))
}

/// Current value of one holding
pub async fn stock_value(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StockValue>, ApiError> {
    Ok(Json(state.engine.stock_value(&id).await?))
}
