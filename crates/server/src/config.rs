//! Server configuration

use std::time::Duration;

use capital_gains_core::errors::CoreError;
use capital_gains_core::EngineSettings;
use serde::Deserialize;

/// Server configuration, read from `CAPITAL_GAINS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Comma-separated base URLs of the holdings service replicas
    pub stocks_service_urls: String,
    /// `api-ninjas`, `yahoo` or `static`
    pub price_provider: String,
    /// API key for the price provider, if it needs one
    pub price_api_key: Option<String>,
    /// `SYM=price,...` table for the static provider
    pub static_prices: Option<String>,
    /// Per-lookup price timeout in seconds (0 disables it)
    pub price_timeout_secs: u64,
    /// Holdings service request timeout in seconds
    pub holdings_timeout_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            stocks_service_urls: String::new(),
            price_provider: "api-ninjas".to_string(),
            price_api_key: None,
            static_prices: None,
            price_timeout_secs: 10,
            holdings_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the environment.
    ///
    /// `STOCKS_SERVICE_URL`, `CAPITAL_GAIN_SERVICE_PORT` and `NINJA_API_KEY`
    /// are honoured as fallbacks for the prefixed variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let port = std::env::var("CAPITAL_GAIN_SERVICE_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(port))?
            .set_default(
                "stocks_service_urls",
                std::env::var("STOCKS_SERVICE_URL").unwrap_or_default(),
            )?
            .set_default("price_provider", defaults.price_provider)?
            .set_default("price_api_key", std::env::var("NINJA_API_KEY").ok())?
            .set_default("price_timeout_secs", defaults.price_timeout_secs as i64)?
            .set_default("holdings_timeout_secs", defaults.holdings_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("CAPITAL_GAINS"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replica base URLs, with blanks dropped.
    pub fn holdings_urls(&self) -> Vec<String> {
        self.stocks_service_urls
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Translate into the settings the valuation engine is built from.
    pub fn engine_settings(&self) -> Result<EngineSettings, CoreError> {
        let holdings_urls = self.holdings_urls();
        if holdings_urls.is_empty() {
            return Err(CoreError::Configuration(
                "set CAPITAL_GAINS_STOCKS_SERVICE_URLS (or STOCKS_SERVICE_URL)".into(),
            ));
        }

        Ok(EngineSettings {
            holdings_urls,
            price_provider: self.price_provider.parse()?,
            price_api_key: self.price_api_key.clone(),
            static_prices: self.static_prices.clone(),
            price_timeout: (self.price_timeout_secs > 0)
                .then(|| Duration::from_secs(self.price_timeout_secs)),
            holdings_timeout: Duration::from_secs(self.holdings_timeout_secs),
        })
    }
}
