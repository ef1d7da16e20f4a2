//! Special additional deductions applied ahead of withholding.
//!
//! Six statutory categories exist, each with its own cap. Every category
//! except serious illness is capped per month; serious illness is capped
//! per year.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six statutory special-deduction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeductionType {
    ChildEducation,
    ContinuingEducation,
    SeriousIllness,
    HousingLoanInterest,
    HousingRent,
    ElderCare,
}

impl DeductionType {
    pub const ALL: [DeductionType; 6] = [
        Self::ChildEducation,
        Self::ContinuingEducation,
        Self::SeriousIllness,
        Self::HousingLoanInterest,
        Self::HousingRent,
        Self::ElderCare,
    ];

    /// Statutory monthly cap, where the category has one.
    ///
    /// Serious illness is capped annually instead; see [`annual_cap`].
    ///
    /// [`annual_cap`]: DeductionType::annual_cap
    pub fn monthly_cap(&self) -> Option<Decimal> {
        match self {
            Self::ChildEducation => Some(Decimal::from(2000)),
            Self::ContinuingEducation => Some(Decimal::from(400)),
            Self::SeriousIllness => None,
            Self::HousingLoanInterest => Some(Decimal::from(1000)),
            Self::HousingRent => Some(Decimal::from(1500)),
            Self::ElderCare => Some(Decimal::from(3000)),
        }
    }

    /// Statutory annual cap.
    pub fn annual_cap(&self) -> Decimal {
        match self.monthly_cap() {
            Some(monthly) => monthly * Decimal::from(12),
            None => Decimal::from(80000),
        }
    }

    /// The cap a single declared amount is validated against: the monthly
    /// cap where one exists, the annual cap otherwise.
    pub fn declared_cap(&self) -> Decimal {
        self.monthly_cap().unwrap_or_else(|| self.annual_cap())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildEducation => "child_education",
            Self::ContinuingEducation => "continuing_education",
            Self::SeriousIllness => "serious_illness",
            Self::HousingLoanInterest => "housing_loan_interest",
            Self::HousingRent => "housing_rent",
            Self::ElderCare => "elder_care",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "child_education" => Some(Self::ChildEducation),
            "continuing_education" => Some(Self::ContinuingEducation),
            "serious_illness" => Some(Self::SeriousIllness),
            "housing_loan_interest" => Some(Self::HousingLoanInterest),
            "housing_rent" => Some(Self::HousingRent),
            "elder_care" => Some(Self::ElderCare),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeductionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when constructing a [`Deduction`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionError {
    /// Deduction amounts must be non-negative.
    #[error("deduction amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    /// The declared amount exceeds the category's statutory cap.
    #[error("{deduction_type} deduction {amount} exceeds statutory cap {cap}")]
    AmountExceedsCap {
        deduction_type: DeductionType,
        amount: Decimal,
        cap: Decimal,
    },
}

/// A declared special deduction, validated against its category cap at
/// construction. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    deduction_type: DeductionType,
    amount: Decimal,
    description: String,
    metadata: BTreeMap<String, String>,
}

impl Deduction {
    /// Creates a deduction of `amount` for `deduction_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DeductionError`] if the amount is negative or exceeds the
    /// category's cap.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::models::{Deduction, DeductionType};
    ///
    /// let deduction = Deduction::new(
    ///     DeductionType::HousingRent,
    ///     dec!(1500),
    ///     "rented flat, city of employment",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(deduction.amount(), dec!(1500));
    /// ```
    pub fn new(
        deduction_type: DeductionType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, DeductionError> {
        Self::with_metadata(deduction_type, amount, description, BTreeMap::new())
    }

    /// Like [`new`], with caller-supplied metadata attached.
    ///
    /// [`new`]: Deduction::new
    pub fn with_metadata(
        deduction_type: DeductionType,
        amount: Decimal,
        description: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, DeductionError> {
        if amount < Decimal::ZERO {
            return Err(DeductionError::NegativeAmount(amount));
        }
        let cap = deduction_type.declared_cap();
        if amount > cap {
            return Err(DeductionError::AmountExceedsCap {
                deduction_type,
                amount,
                cap,
            });
        }
        Ok(Self {
            deduction_type,
            amount,
            description: description.into(),
            metadata,
        })
    }

    pub fn deduction_type(&self) -> DeductionType {
        self.deduction_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Whether the amount is within the category cap. Always true for an
    /// instance built through [`new`], kept as a compliance re-check.
    ///
    /// [`new`]: Deduction::new
    pub fn within_cap(&self) -> bool {
        self.amount <= self.deduction_type.declared_cap()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_accepts_amount_at_cap() {
        let deduction = Deduction::new(DeductionType::ChildEducation, dec!(2000), "one child");

        assert!(deduction.is_ok());
    }

    #[test]
    fn new_rejects_negative_amount() {
        let result = Deduction::new(DeductionType::HousingRent, dec!(-100), "");

        assert_eq!(result, Err(DeductionError::NegativeAmount(dec!(-100))));
    }

    #[test]
    fn new_rejects_amount_above_monthly_cap() {
        let result = Deduction::new(DeductionType::ContinuingEducation, dec!(500), "");

        assert_eq!(
            result,
            Err(DeductionError::AmountExceedsCap {
                deduction_type: DeductionType::ContinuingEducation,
                amount: dec!(500),
                cap: dec!(400),
            })
        );
    }

    #[test]
    fn serious_illness_validates_against_annual_cap() {
        let ok = Deduction::new(DeductionType::SeriousIllness, dec!(80000), "");
        let too_much = Deduction::new(DeductionType::SeriousIllness, dec!(80000.01), "");

        assert!(ok.is_ok());
        assert_eq!(
            too_much,
            Err(DeductionError::AmountExceedsCap {
                deduction_type: DeductionType::SeriousIllness,
                amount: dec!(80000.01),
                cap: dec!(80000),
            })
        );
    }

    #[test]
    fn zero_amount_is_valid() {
        let deduction = Deduction::new(DeductionType::ElderCare, dec!(0), "").unwrap();

        assert_eq!(deduction.amount(), dec!(0));
        assert!(deduction.within_cap());
    }

    #[test]
    fn annual_cap_is_twelve_times_monthly_where_monthly_exists() {
        assert_eq!(DeductionType::HousingLoanInterest.annual_cap(), dec!(12000));
        assert_eq!(DeductionType::ElderCare.annual_cap(), dec!(36000));
    }

    #[test]
    fn serious_illness_has_no_monthly_cap() {
        assert_eq!(DeductionType::SeriousIllness.monthly_cap(), None);
        assert_eq!(DeductionType::SeriousIllness.annual_cap(), dec!(80000));
    }

    #[test]
    fn metadata_is_preserved() {
        let mut metadata = BTreeMap::new();
        metadata.insert("dependent".to_string(), "parent".to_string());

        let deduction = Deduction::with_metadata(
            DeductionType::ElderCare,
            dec!(3000),
            "sole supporter",
            metadata,
        )
        .unwrap();

        assert_eq!(
            deduction.metadata().get("dependent").map(String::as_str),
            Some("parent")
        );
    }

    #[test]
    fn parse_round_trips_every_category() {
        for ty in DeductionType::ALL {
            assert_eq!(DeductionType::parse(ty.as_str()), Some(ty));
        }
    }
}
