//! Social-insurance and housing-fund contribution calculations.
//!
//! Contributions are computed per insurance type from a clamped
//! contribution base and region-specific rates. Regional configuration is
//! advisory: a missing or failing lookup falls back to the insurance
//! type's statutory standard rates and the calculation proceeds. Region
//! support and base/period year agreement are hard requirements.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::calculations::ContributionCalculator;
//! use payroll_core::config::{
//!     ConfigError, ContributionLimits, InsuranceRates, RegionalConfigProvider,
//! };
//! use payroll_core::models::{ContributionBase, Employee, InsuranceType, PayrollPeriod};
//! use chrono::NaiveDate;
//!
//! struct Flat;
//!
//! impl RegionalConfigProvider for Flat {
//!     fn insurance_rates(
//!         &self,
//!         _region: &str,
//!         _insurance_type: InsuranceType,
//!     ) -> Result<InsuranceRates, ConfigError> {
//!         Ok(InsuranceRates {
//!             employer_rate: dec!(0.20),
//!             employee_rate: dec!(0.08),
//!         })
//!     }
//!
//!     fn contribution_limits(
//!         &self,
//!         _region: &str,
//!         _insurance_type: InsuranceType,
//!         _year: i32,
//!     ) -> Result<ContributionLimits, ConfigError> {
//!         Ok(ContributionLimits {
//!             min_base: dec!(3000),
//!             max_base: dec!(30000),
//!         })
//!     }
//!
//!     fn supported_regions(&self) -> Vec<String> {
//!         vec!["beijing".to_string()]
//!     }
//! }
//!
//! let employee = Employee::new(
//!     "EMP-001",
//!     dec!(8000),
//!     NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
//!     None,
//! )
//! .unwrap();
//! let period = PayrollPeriod::new(2024, 3).unwrap();
//! let base = ContributionBase::new(
//!     InsuranceType::Pension,
//!     dec!(8000),
//!     dec!(3000),
//!     dec!(30000),
//!     "beijing",
//!     2024,
//! )
//! .unwrap();
//!
//! let calculator = ContributionCalculator::new(&Flat);
//! let result = calculator
//!     .calculate(&employee, &period, InsuranceType::Pension, &base, "beijing")
//!     .unwrap();
//!
//! assert_eq!(result.employer_amount(), dec!(1600.00));
//! assert_eq!(result.employee_amount(), dec!(640.00));
//! assert_eq!(result.total_amount(), dec!(2240.00));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::config::{InsuranceRates, RegionalConfigProvider};
use crate::models::{
    ContributionBase, Employee, InsuranceResultError, InsuranceType, PayrollPeriod,
    SocialInsuranceResult,
};

/// Errors that can occur during contribution calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContributionError {
    /// The region is not covered by the configuration provider.
    #[error("region '{region}' is not supported; supported regions: {supported:?}")]
    UnsupportedRegion {
        region: String,
        supported: Vec<String>,
    },

    /// The contribution base was declared for a different year than the
    /// payroll period. Strict equality, not containment.
    #[error(
        "contribution base year {contribution_year} does not match payroll period year {period_year}"
    )]
    YearMismatch {
        contribution_year: i32,
        period_year: i32,
    },

    /// `calculate_all` requires a base for every insurance type.
    #[error("no contribution base supplied for {0}")]
    MissingContributionBase(InsuranceType),

    /// The computed figures failed result validation.
    #[error(transparent)]
    InvalidResult(#[from] InsuranceResultError),
}

/// Calculator for employer and employee contributions across the six
/// insurance types.
pub struct ContributionCalculator<'a> {
    provider: &'a dyn RegionalConfigProvider,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(provider: &'a dyn RegionalConfigProvider) -> Self {
        Self { provider }
    }

    /// Computes the contribution for one insurance type.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError`] if the region is unsupported, the
    /// base's year differs from the period's year, or the computed figures
    /// fail result validation. A failed rate lookup is not an error; the
    /// insurance type's standard rates are used instead.
    pub fn calculate(
        &self,
        employee: &Employee,
        period: &PayrollPeriod,
        insurance_type: InsuranceType,
        contribution_base: &ContributionBase,
        region: &str,
    ) -> Result<SocialInsuranceResult, ContributionError> {
        if !self.provider.is_region_supported(region) {
            return Err(ContributionError::UnsupportedRegion {
                region: region.to_string(),
                supported: self.provider.supported_regions(),
            });
        }
        if contribution_base.year() != period.year() {
            return Err(ContributionError::YearMismatch {
                contribution_year: contribution_base.year(),
                period_year: period.year(),
            });
        }

        let rates = self.rates_or_standard(employee, region, insurance_type);

        let actual_base = contribution_base.actual_base();
        let employer_amount = round_half_up(actual_base * rates.employer_rate);
        let employee_amount = round_half_up(actual_base * rates.employee_rate);

        let result = SocialInsuranceResult::new(
            insurance_type,
            contribution_base.clone(),
            rates.employer_rate,
            rates.employee_rate,
            employer_amount,
            employee_amount,
            region,
        )?;
        Ok(result)
    }

    /// Computes contributions for all six insurance types.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionError::MissingContributionBase`] naming the
    /// first insurance type without a matching base in `contribution_bases`,
    /// or any error a per-type calculation raises.
    pub fn calculate_all(
        &self,
        employee: &Employee,
        period: &PayrollPeriod,
        contribution_bases: &[ContributionBase],
        region: &str,
    ) -> Result<BTreeMap<InsuranceType, SocialInsuranceResult>, ContributionError> {
        let mut results = BTreeMap::new();
        for insurance_type in InsuranceType::ALL {
            let base = contribution_bases
                .iter()
                .find(|b| b.insurance_type() == insurance_type)
                .ok_or(ContributionError::MissingContributionBase(insurance_type))?;
            let result = self.calculate(employee, period, insurance_type, base, region)?;
            results.insert(insurance_type, result);
        }
        Ok(results)
    }

    /// Sums the employee share of every tax-deductible contribution.
    ///
    /// A pure reduction over the given results; order does not matter.
    pub fn total_tax_deduction<'r>(
        &self,
        results: impl IntoIterator<Item = &'r SocialInsuranceResult>,
    ) -> Decimal {
        results
            .into_iter()
            .filter(|r| r.insurance_type().is_tax_deductible())
            .map(SocialInsuranceResult::employee_amount)
            .sum()
    }

    /// Whether the base's clamped value sits inside the band the region
    /// requires for its insurance type and year.
    ///
    /// The base is clamped against its *own* limits, the region may
    /// require a different band: a base constructed with looser limits
    /// than the region's can fail this check even though its own
    /// `needs_adjustment()` is false. A failed limit lookup falls back to
    /// the base's own band and the check passes.
    pub fn validate_contribution_base(
        &self,
        contribution_base: &ContributionBase,
        region: &str,
    ) -> bool {
        let actual_base = contribution_base.actual_base();
        match self.provider.contribution_limits(
            region,
            contribution_base.insurance_type(),
            contribution_base.year(),
        ) {
            Ok(limits) => actual_base >= limits.min_base && actual_base <= limits.max_base,
            Err(error) => {
                warn!(
                    region,
                    insurance_type = %contribution_base.insurance_type(),
                    year = contribution_base.year(),
                    %error,
                    "no regional contribution limits; validating against the base's own band"
                );
                actual_base >= contribution_base.min_amount()
                    && actual_base <= contribution_base.max_amount()
            }
        }
    }

    /// Regional rates, or the insurance type's statutory standard rates
    /// when the provider has nothing for this key.
    fn rates_or_standard(
        &self,
        employee: &Employee,
        region: &str,
        insurance_type: InsuranceType,
    ) -> InsuranceRates {
        match self.provider.insurance_rates(region, insurance_type) {
            Ok(rates) => rates,
            Err(error) => {
                warn!(
                    employee = %employee.employee_number(),
                    region,
                    insurance_type = %insurance_type,
                    %error,
                    "regional rate lookup failed; falling back to standard rates"
                );
                InsuranceRates {
                    employer_rate: insurance_type.standard_employer_rate(),
                    employee_rate: insurance_type.standard_employee_rate(),
                }
            }
        }
    }
}
