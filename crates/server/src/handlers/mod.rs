pub mod capital_gains;
pub mod health;
pub mod portfolio;
