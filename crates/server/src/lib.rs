//! HTTP boundary of the capital-gains service.
//!
//! Thin wrapper over [`AggregationEngine`]: parses query parameters, maps
//! core errors onto status codes, and serialises results.
//!
//! # Routes
//!
//! - `GET /capital-gains?numsharesgt=&numshareslt=`: total capital gain
//! - `GET /portfolio-value`: value of every holding in the store
//! - `GET /stock-value/:id`: value of one holding
//! - `GET /health`

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use capital_gains_core::services::aggregation_service::AggregationEngine;
use tower_http::trace::TraceLayer;

use crate::handlers::{capital_gains, health, portfolio};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AggregationEngine>,
}

/// Creates the API router around a ready-built engine
pub fn create_router(engine: AggregationEngine) -> Router {
    let state = AppState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .route("/capital-gains", get(capital_gains::capital_gains))
        .route("/portfolio-value", get(portfolio::portfolio_value))
        .route("/stock-value/:id", get(portfolio::stock_value))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
