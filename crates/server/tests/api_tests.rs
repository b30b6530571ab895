// ═══════════════════════════════════════════════════════════════════
// API Tests: routes, status mapping, configuration
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

use capital_gains_core::errors::CoreError;
use capital_gains_core::models::holding::HoldingRecord;
use capital_gains_core::providers::registry::PriceProviderKind;
use capital_gains_core::providers::static_prices::StaticPriceProvider;
use capital_gains_core::services::aggregation_service::AggregationEngine;
use capital_gains_core::services::price_service::PriceService;
use capital_gains_core::store::payload::decode_holdings;
use capital_gains_core::store::traits::HoldingsStore;
use capital_gains_server::config::ServerConfig;
use capital_gains_server::create_router;

/// Holdings store that decodes a fixed payload on every call.
struct FixedStore(Value);

#[async_trait]
impl HoldingsStore for FixedStore {
    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        decode_holdings(self.0.clone())
    }

    async fn fetch_holding(&self, id: &str) -> Result<HoldingRecord, CoreError> {
        self.fetch_holdings()
            .await?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))
    }
}

fn portfolio() -> Value {
    json!([
        {"id": "1", "name": "NVIDIA Corporation", "symbol": "NVDA",
         "purchase price": 134.66, "purchase date": "18-06-2024", "shares": 7},
        {"id": "2", "name": "Apple Inc.", "symbol": "AAPL",
         "purchase price": 183.63, "purchase date": "22-02-2024", "shares": 19}
    ])
}

fn server(payload: Value) -> TestServer {
    let prices = StaticPriceProvider::new()
        .with_price("NVDA", dec!(140.00))
        .with_price("AAPL", dec!(190.00));
    let engine = AggregationEngine::new(
        Arc::new(FixedStore(payload)),
        PriceService::new(Arc::new(prices)),
    );
    TestServer::new(create_router(engine)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// GET /capital-gains
// ═══════════════════════════════════════════════════════════════════

mod capital_gains {
    use super::*;

    #[tokio::test]
    async fn returns_total_as_plain_number() {
        let response = server(portfolio()).get("/capital-gains").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "158.41");
    }

    #[tokio::test]
    async fn applies_numsharesgt() {
        let response = server(portfolio())
            .get("/capital-gains")
            .add_query_param("numsharesgt", 10)
            .await;
        response.assert_status_ok();
        assert_eq!(response.text(), "121.03");
    }

    #[tokio::test]
    async fn applies_both_bounds() {
        let response = server(portfolio())
            .get("/capital-gains")
            .add_query_param("numsharesgt", 1)
            .add_query_param("numshareslt", 10)
            .await;
        assert_eq!(response.text(), "37.38");
    }

    #[tokio::test]
    async fn empty_store_is_zero() {
        let response = server(json!([])).get("/capital-gains").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "0.00");
    }

    #[tokio::test]
    async fn non_integer_bound_is_bad_request() {
        let response = server(portfolio())
            .get("/capital-gains")
            .add_query_param("numshareslt", "ten")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].as_str().unwrap().contains("numshareslt"));
    }

    #[tokio::test]
    async fn malformed_holding_is_bad_request() {
        let response = server(json!([
            {"id": "1", "symbol": "NVDA", "purchase price": 134.66, "shares": 7},
            {"id": "9", "name": "Amazon.com, Inc.", "purchase price": 100.0, "shares": 3}
        ]))
        .get("/capital-gains")
        .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "malformed_data");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("'symbol'"), "{message}");
        assert!(message.contains("9"), "{message}");
    }

    #[tokio::test]
    async fn object_payload_is_server_error() {
        let response = server(json!({"stocks": []})).get("/capital-gains").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "server_error");
    }

    #[tokio::test]
    async fn unknown_price_is_server_error() {
        let response = server(json!([
            {"id": "5", "symbol": "ZZZZ", "purchase price": 1.0, "shares": 1}
        ]))
        .get("/capital-gains")
        .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// ═══════════════════════════════════════════════════════════════════
// GET /portfolio-value, GET /stock-value/:id
// ═══════════════════════════════════════════════════════════════════

mod valuation {
    use super::*;

    #[tokio::test]
    async fn portfolio_value() {
        let response = server(portfolio()).get("/portfolio-value").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["portfolio value"], 4590.0);
        assert_eq!(body["date"].as_str().unwrap().len(), "DD-MM-YYYY".len());
    }

    #[tokio::test]
    async fn stock_value() {
        let response = server(portfolio()).get("/stock-value/2").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!({"symbol": "AAPL", "ticker": 190.0, "stock value": 3610.0}));
    }

    #[tokio::test]
    async fn unknown_stock_is_not_found() {
        let response = server(portfolio()).get("/stock-value/42").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "not_found");
    }
}

// ═══════════════════════════════════════════════════════════════════
// GET /health
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_check() {
    let response = server(json!([])).get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

// ═══════════════════════════════════════════════════════════════════
// ServerConfig
// ═══════════════════════════════════════════════════════════════════

mod configuration {
    use super::*;
    use std::time::Duration;

    fn config(urls: &str) -> ServerConfig {
        ServerConfig {
            stocks_service_urls: urls.into(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
        assert_eq!(config.price_provider, "api-ninjas");
    }

    #[test]
    fn splits_replica_urls() {
        let config = config("http://stocks1:8000, http://stocks2:8000 ,,");
        assert_eq!(
            config.holdings_urls(),
            vec!["http://stocks1:8000".to_string(), "http://stocks2:8000".to_string()]
        );
    }

    #[test]
    fn engine_settings_need_replicas() {
        assert!(config("  ").engine_settings().is_err());
    }

    #[test]
    fn engine_settings() {
        let settings = ServerConfig {
            price_provider: "static".into(),
            static_prices: Some("NVDA=140".into()),
            price_timeout_secs: 3,
            ..config("http://stocks1:8000")
        }
        .engine_settings()
        .unwrap();

        assert_eq!(settings.price_provider, PriceProviderKind::Static);
        assert_eq!(settings.price_timeout, Some(Duration::from_secs(3)));
        assert_eq!(settings.holdings_urls.len(), 1);
    }

    #[test]
    fn zero_timeout_disables_price_timeout() {
        let settings = ServerConfig {
            price_timeout_secs: 0,
            ..config("http://stocks1:8000")
        }
        .engine_settings()
        .unwrap();
        assert_eq!(settings.price_timeout, None);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = ServerConfig {
            price_provider: "bloomberg".into(),
            ..config("http://stocks1:8000")
        }
        .engine_settings();
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}
