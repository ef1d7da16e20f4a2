pub mod calculations;
pub mod config;
pub mod models;

pub use config::{ConfigError, ContributionLimits, InsuranceRates, RegionalConfigProvider};
pub use models::*;
