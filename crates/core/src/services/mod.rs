pub mod aggregation_service;
pub mod gains_calculator;
pub mod holdings_filter;
pub mod price_service;
