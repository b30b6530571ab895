use axum::routing::get;
use axum::{Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::time::Duration;

use capital_gains_core::errors::{CoreError, StatusClass};
use capital_gains_core::providers::registry::PriceProviderKind;
use capital_gains_core::services::aggregation_service::within_tolerance;
use capital_gains_core::{build_engine, EngineSettings};

// ═══════════════════════════════════════════════════════════════════
// Stub holdings service (real HTTP, local port)
// ═══════════════════════════════════════════════════════════════════

async fn spawn_stocks_service(body: Value) -> String {
    let router = Router::new().route("/stocks", get(move || async move { Json(body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn portfolio() -> Value {
    json!([
        {"id": "1", "name": "NVIDIA Corporation", "symbol": "NVDA",
         "purchase price": 134.66, "purchase date": "18-06-2024", "shares": 7},
        {"id": "2", "name": "Apple Inc.", "symbol": "AAPL",
         "purchase price": 183.63, "purchase date": "22-02-2024", "shares": 19}
    ])
}

fn static_settings(urls: Vec<String>) -> EngineSettings {
    EngineSettings {
        holdings_urls: urls,
        price_provider: PriceProviderKind::Static,
        static_prices: Some("NVDA=140.00,AAPL=190.00".into()),
        price_timeout: Some(Duration::from_secs(5)),
        holdings_timeout: Duration::from_secs(5),
        ..EngineSettings::default()
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wiring
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_build_engine_requires_replicas() {
    let err = build_engine(&static_settings(vec![])).err().unwrap();
    assert!(matches!(err, CoreError::Configuration(_)), "{err}");
}

#[test]
fn test_build_engine_requires_api_key_for_api_ninjas() {
    let settings = EngineSettings {
        holdings_urls: vec!["http://stocks:8000".into()],
        ..EngineSettings::default()
    };
    assert!(build_engine(&settings).is_err());

    let with_key = EngineSettings {
        price_api_key: Some("key".into()),
        ..settings
    };
    assert!(build_engine(&with_key).is_ok());
}

#[test]
fn test_default_settings() {
    let settings = EngineSettings::default();
    assert_eq!(settings.price_provider, PriceProviderKind::ApiNinjas);
    assert_eq!(settings.price_timeout, Some(Duration::from_secs(10)));
    assert_eq!(settings.holdings_timeout, Duration::from_secs(30));
}

// ═══════════════════════════════════════════════════════════════════
// End to end over HTTP
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_capital_gains_end_to_end() {
    let base = spawn_stocks_service(portfolio()).await;
    let engine = build_engine(&static_settings(vec![base])).unwrap();

    assert_eq!(engine.total_capital_gain(None, None).await.unwrap(), dec!(158.41));
    assert_eq!(engine.total_capital_gain(Some(10), None).await.unwrap(), dec!(121.03));
    assert_eq!(engine.total_capital_gain(None, Some(10)).await.unwrap(), dec!(37.38));
}

#[tokio::test]
async fn test_replicas_serve_the_same_answer() {
    let first = spawn_stocks_service(portfolio()).await;
    let second = spawn_stocks_service(portfolio()).await;
    let engine = build_engine(&static_settings(vec![first, second])).unwrap();

    for _ in 0..4 {
        assert_eq!(engine.total_capital_gain(None, None).await.unwrap(), dec!(158.41));
    }
}

#[tokio::test]
async fn test_object_payload_fails_with_server_error() {
    let base = spawn_stocks_service(json!({"stocks": portfolio()})).await;
    let engine = build_engine(&static_settings(vec![base])).unwrap();

    let err = engine.total_capital_gain(None, None).await.unwrap_err();
    assert!(matches!(err, CoreError::UpstreamDataInvalid(_)), "{err}");
    assert_eq!(err.status_class(), StatusClass::ServerError);
}

#[tokio::test]
async fn test_portfolio_value_reconciles_with_stock_values() {
    let base = spawn_stocks_service(portfolio()).await;
    let engine = build_engine(&static_settings(vec![base])).unwrap();

    let valuation = engine.portfolio_value().await.unwrap();
    assert_eq!(valuation.portfolio_value, dec!(4590.00));

    let report = engine.reconcile(dec!(4500)).await.unwrap();
    assert!(report.within_tolerance);
    assert!(within_tolerance(report.computed, valuation.portfolio_value));
}
