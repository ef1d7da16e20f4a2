pub mod provider;

pub use provider::{ConfigError, ContributionLimits, InsuranceRates, RegionalConfigProvider};
