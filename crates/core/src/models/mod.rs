pub mod holding;
pub mod price;
pub mod valuation;
