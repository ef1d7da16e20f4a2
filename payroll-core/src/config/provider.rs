//! Regional configuration consumed by the contribution calculator.
//!
//! The engine only depends on this interface; where the rates and limits
//! actually live (embedded tables, loaded files, a remote service) is the
//! provider's concern. A lookup failure is never fatal to a calculation:
//! callers fall back to the insurance type's statutory standard rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::InsuranceType;

/// Errors a provider may surface from a lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No entry exists for the requested key.
    #[error("no regional configuration for {insurance_type} in region '{region}'")]
    NotFound {
        region: String,
        insurance_type: InsuranceType,
    },

    /// The provider itself failed (I/O, parse, upstream service).
    #[error("regional configuration provider error: {0}")]
    Provider(String),
}

/// Employer and employee contribution rates for one insurance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRates {
    pub employer_rate: Decimal,
    pub employee_rate: Decimal,
}

/// Contribution base band required by a region for one insurance type and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub min_base: Decimal,
    pub max_base: Decimal,
}

/// Source of per-region contribution rates and base limits.
///
/// Implementations are expected to be cheap, synchronous lookups; the
/// calculators call them inline and treat any [`ConfigError`] as a soft
/// failure.
pub trait RegionalConfigProvider: Send + Sync {
    /// Rates for `insurance_type` in `region`.
    fn insurance_rates(
        &self,
        region: &str,
        insurance_type: InsuranceType,
    ) -> Result<InsuranceRates, ConfigError>;

    /// Base band for `insurance_type` in `region` during `year`.
    fn contribution_limits(
        &self,
        region: &str,
        insurance_type: InsuranceType,
        year: i32,
    ) -> Result<ContributionLimits, ConfigError>;

    /// Every region this provider has configuration for.
    fn supported_regions(&self) -> Vec<String>;

    /// Whether `region` is covered, ignoring case and surrounding whitespace.
    fn is_region_supported(&self, region: &str) -> bool {
        let wanted = region.trim().to_lowercase();
        self.supported_regions()
            .iter()
            .any(|r| r.to_lowercase() == wanted)
    }
}
