//! Capital gains service - API server binary
//!
//! # Environment Variables
//!
//! * `CAPITAL_GAINS_HOST` - Server host (default: 0.0.0.0)
//! * `CAPITAL_GAINS_PORT` - Server port (default: 8000, or `CAPITAL_GAIN_SERVICE_PORT`)
//! * `CAPITAL_GAINS_STOCKS_SERVICE_URLS` - Comma-separated holdings service base URLs
//!   (falls back to `STOCKS_SERVICE_URL`)
//! * `CAPITAL_GAINS_PRICE_PROVIDER` - `api-ninjas`, `yahoo` or `static` (default: api-ninjas)
//! * `CAPITAL_GAINS_PRICE_API_KEY` - Price provider API key (falls back to `NINJA_API_KEY`)
//! * `CAPITAL_GAINS_STATIC_PRICES` - `SYM=price,...` for the static provider
//! * `CAPITAL_GAINS_PRICE_TIMEOUT_SECS` - Per-lookup price timeout (default: 10, 0 disables)
//! * `CAPITAL_GAINS_HOLDINGS_TIMEOUT_SECS` - Holdings service request timeout (default: 30)
//! * `CAPITAL_GAINS_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use capital_gains_core::build_engine;
use capital_gains_server::{config::ServerConfig, create_router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        price_provider = %config.price_provider,
        "Starting capital gains service"
    );

    let engine = build_engine(&config.engine_settings()?)?;
    let app = create_router(engine);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
