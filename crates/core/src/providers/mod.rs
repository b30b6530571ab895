pub mod registry;
pub mod traits;

// Price source implementations
pub mod api_ninjas;
pub mod static_prices;
pub mod yahoo_finance;
