use std::str::FromStr;
use std::sync::Arc;

use super::api_ninjas::ApiNinjasProvider;
use super::static_prices::StaticPriceProvider;
use super::traits::PriceProvider;
use super::yahoo_finance::YahooFinanceProvider;
use crate::errors::CoreError;

/// Which live price source the service should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceProviderKind {
    /// API Ninjas `stockprice` endpoint (requires an API key)
    ApiNinjas,
    /// Yahoo Finance, no key needed
    Yahoo,
    /// Fixed table from configuration
    Static,
}

impl FromStr for PriceProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api-ninjas" | "api_ninjas" | "apininjas" => Ok(Self::ApiNinjas),
            "yahoo" | "yahoo-finance" => Ok(Self::Yahoo),
            "static" => Ok(Self::Static),
            other => Err(CoreError::Configuration(format!(
                "unknown price provider '{other}' (expected api-ninjas, yahoo or static)"
            ))),
        }
    }
}

impl std::fmt::Display for PriceProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceProviderKind::ApiNinjas => write!(f, "api-ninjas"),
            PriceProviderKind::Yahoo => write!(f, "yahoo"),
            PriceProviderKind::Static => write!(f, "static"),
        }
    }
}

/// Build the configured price provider.
///
/// `api_key` is required for API Ninjas; `static_prices` (`SYM=price,...`)
/// is required for the static table. Both are ignored otherwise.
pub fn build_provider(
    kind: PriceProviderKind,
    api_key: Option<&str>,
    static_prices: Option<&str>,
) -> Result<Arc<dyn PriceProvider>, CoreError> {
    match kind {
        PriceProviderKind::ApiNinjas => {
            let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                CoreError::Configuration("the api-ninjas price provider needs an API key".into())
            })?;
            Ok(Arc::new(ApiNinjasProvider::new(key.to_string())))
        }
        PriceProviderKind::Yahoo => Ok(Arc::new(YahooFinanceProvider::new()?)),
        PriceProviderKind::Static => {
            let table = StaticPriceProvider::parse(static_prices.unwrap_or_default())?;
            if table.is_empty() {
                return Err(CoreError::Configuration(
                    "the static price provider needs at least one SYM=price entry".into(),
                ));
            }
            Ok(Arc::new(table))
        }
    }
}
