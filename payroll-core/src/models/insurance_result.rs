//! Computed contribution result for a single insurance type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::contribution_base::ContributionBase;
use super::insurance_type::InsuranceType;
use crate::calculations::common::amounts_agree;

/// Errors raised when constructing a [`SocialInsuranceResult`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsuranceResultError {
    /// Contribution amounts must be non-negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// Contribution rates are fractions in [0, 1].
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },
}

/// Employer and employee contribution for one insurance type. Immutable,
/// validated at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceResult {
    insurance_type: InsuranceType,
    contribution_base: ContributionBase,
    employer_rate: Decimal,
    employee_rate: Decimal,
    employer_amount: Decimal,
    employee_amount: Decimal,
    region: String,
}

impl SocialInsuranceResult {
    /// Validates and freezes a computed contribution.
    ///
    /// # Errors
    ///
    /// Returns [`InsuranceResultError`] if an amount is negative or a rate
    /// falls outside [0, 1].
    pub fn new(
        insurance_type: InsuranceType,
        contribution_base: ContributionBase,
        employer_rate: Decimal,
        employee_rate: Decimal,
        employer_amount: Decimal,
        employee_amount: Decimal,
        region: impl Into<String>,
    ) -> Result<Self, InsuranceResultError> {
        for (field, value) in [
            ("employer rate", employer_rate),
            ("employee rate", employee_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(InsuranceResultError::RateOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("employer amount", employer_amount),
            ("employee amount", employee_amount),
        ] {
            if value < Decimal::ZERO {
                return Err(InsuranceResultError::NegativeAmount { field, value });
            }
        }
        Ok(Self {
            insurance_type,
            contribution_base,
            employer_rate,
            employee_rate,
            employer_amount,
            employee_amount,
            region: region.into(),
        })
    }

    pub fn insurance_type(&self) -> InsuranceType {
        self.insurance_type
    }

    pub fn contribution_base(&self) -> &ContributionBase {
        &self.contribution_base
    }

    pub fn employer_rate(&self) -> Decimal {
        self.employer_rate
    }

    pub fn employee_rate(&self) -> Decimal {
        self.employee_rate
    }

    pub fn employer_amount(&self) -> Decimal {
        self.employer_amount
    }

    pub fn employee_amount(&self) -> Decimal {
        self.employee_amount
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Combined employer and employee contribution.
    pub fn total_amount(&self) -> Decimal {
        self.employer_amount + self.employee_amount
    }

    /// Whether both amounts reconcile with `actual_base × rate` within the
    /// 0.01 monetary tolerance.
    pub fn is_valid(&self) -> bool {
        let actual_base = self.contribution_base.actual_base();
        amounts_agree(self.employer_amount, actual_base * self.employer_rate)
            && amounts_agree(self.employee_amount, actual_base * self.employee_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn pension_base() -> ContributionBase {
        ContributionBase::new(
            InsuranceType::Pension,
            dec!(8000),
            dec!(3000),
            dec!(30000),
            "beijing",
            2024,
        )
        .unwrap()
    }

    fn result(employer_amount: Decimal, employee_amount: Decimal) -> SocialInsuranceResult {
        SocialInsuranceResult::new(
            InsuranceType::Pension,
            pension_base(),
            dec!(0.20),
            dec!(0.08),
            employer_amount,
            employee_amount,
            "beijing",
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_negative_employer_amount() {
        let error = SocialInsuranceResult::new(
            InsuranceType::Pension,
            pension_base(),
            dec!(0.20),
            dec!(0.08),
            dec!(-1600),
            dec!(640),
            "beijing",
        )
        .unwrap_err();

        assert_eq!(
            error,
            InsuranceResultError::NegativeAmount {
                field: "employer amount",
                value: dec!(-1600),
            }
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let error = SocialInsuranceResult::new(
            InsuranceType::Pension,
            pension_base(),
            dec!(1.2),
            dec!(0.08),
            dec!(9600),
            dec!(640),
            "beijing",
        )
        .unwrap_err();

        assert_eq!(
            error,
            InsuranceResultError::RateOutOfRange {
                field: "employer rate",
                value: dec!(1.2),
            }
        );
    }

    #[test]
    fn total_amount_sums_both_sides() {
        let result = result(dec!(1600), dec!(640));

        assert_eq!(result.total_amount(), dec!(2240));
    }

    #[test]
    fn is_valid_for_exact_amounts() {
        assert!(result(dec!(1600), dec!(640)).is_valid());
    }

    #[test]
    fn is_valid_tolerates_sub_cent_noise() {
        assert!(result(dec!(1600.009), dec!(640)).is_valid());
    }

    #[test]
    fn is_valid_fails_beyond_tolerance() {
        assert!(!result(dec!(1600.01), dec!(640)).is_valid());
        assert!(!result(dec!(1600), dec!(640.02)).is_valid());
    }

    #[test]
    fn is_valid_uses_the_clamped_base() {
        let clamped = ContributionBase::new(
            InsuranceType::Pension,
            dec!(35000),
            dec!(3000),
            dec!(30000),
            "beijing",
            2024,
        )
        .unwrap();

        // Amounts follow the clamped 30000, not the declared 35000.
        let result = SocialInsuranceResult::new(
            InsuranceType::Pension,
            clamped,
            dec!(0.20),
            dec!(0.08),
            dec!(6000),
            dec!(2400),
            "beijing",
        )
        .unwrap();

        assert!(result.is_valid());
    }
}
