//! Contribution base for a single insurance type.
//!
//! A declared base is clamped to the `[min, max]` band it was constructed
//! with; the clamped value is what contribution amounts are computed from.
//! Adjustment never mutates: it produces a new instance with the clamped
//! base and an audit trail in the metadata.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::insurance_type::InsuranceType;
use crate::calculations::common::clamp;

/// Errors raised when constructing a [`ContributionBase`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContributionBaseError {
    /// All monetary fields must be non-negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// The maximum base must exceed the minimum base.
    #[error("maximum base {max} must exceed minimum base {min}")]
    InvertedLimits { min: Decimal, max: Decimal },

    /// Contribution years outside the supported range are rejected.
    #[error("contribution year must be between 2020 and 2030, got {0}")]
    YearOutOfRange(i32),
}

/// A declared contribution base with its clamping band. Immutable value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBase {
    insurance_type: InsuranceType,
    base_amount: Decimal,
    min_amount: Decimal,
    max_amount: Decimal,
    region: String,
    year: i32,
    metadata: BTreeMap<String, String>,
}

impl ContributionBase {
    /// Creates a contribution base.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionBaseError`] if any amount is negative, the
    /// band is inverted or empty, or the year is outside 2020..=2030.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::models::{ContributionBase, InsuranceType};
    ///
    /// let base = ContributionBase::new(
    ///     InsuranceType::Pension,
    ///     dec!(35000),
    ///     dec!(3000),
    ///     dec!(30000),
    ///     "beijing",
    ///     2024,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(base.actual_base(), dec!(30000));
    /// assert!(base.needs_adjustment());
    /// ```
    pub fn new(
        insurance_type: InsuranceType,
        base_amount: Decimal,
        min_amount: Decimal,
        max_amount: Decimal,
        region: impl Into<String>,
        year: i32,
    ) -> Result<Self, ContributionBaseError> {
        Self::with_metadata(
            insurance_type,
            base_amount,
            min_amount,
            max_amount,
            region,
            year,
            BTreeMap::new(),
        )
    }

    /// Like [`new`], with caller-supplied metadata attached.
    ///
    /// [`new`]: ContributionBase::new
    pub fn with_metadata(
        insurance_type: InsuranceType,
        base_amount: Decimal,
        min_amount: Decimal,
        max_amount: Decimal,
        region: impl Into<String>,
        year: i32,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, ContributionBaseError> {
        for (field, value) in [
            ("base amount", base_amount),
            ("minimum base", min_amount),
            ("maximum base", max_amount),
        ] {
            if value < Decimal::ZERO {
                return Err(ContributionBaseError::NegativeAmount { field, value });
            }
        }
        if max_amount <= min_amount {
            return Err(ContributionBaseError::InvertedLimits {
                min: min_amount,
                max: max_amount,
            });
        }
        if !(2020..=2030).contains(&year) {
            return Err(ContributionBaseError::YearOutOfRange(year));
        }
        Ok(Self {
            insurance_type,
            base_amount,
            min_amount,
            max_amount,
            region: region.into(),
            year,
            metadata,
        })
    }

    pub fn insurance_type(&self) -> InsuranceType {
        self.insurance_type
    }

    /// The declared base, before clamping.
    pub fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    pub fn min_amount(&self) -> Decimal {
        self.min_amount
    }

    pub fn max_amount(&self) -> Decimal {
        self.max_amount
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// The declared base clamped into `[min_amount, max_amount]`; this is
    /// the value contribution amounts are computed from.
    pub fn actual_base(&self) -> Decimal {
        clamp(self.base_amount, self.min_amount, self.max_amount)
    }

    /// Whether the declared base falls outside the band.
    pub fn needs_adjustment(&self) -> bool {
        self.base_amount < self.min_amount || self.base_amount > self.max_amount
    }

    /// Returns this base with the declared amount replaced by the clamped
    /// value.
    ///
    /// When no adjustment is needed the value is returned unchanged, with
    /// no metadata written. Otherwise the result carries
    /// `adjusted = "true"` and `original_base = <declared amount>` merged
    /// over the existing metadata. Idempotent: an adjusted base is inside
    /// its band, so a second call is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::models::{ContributionBase, InsuranceType};
    ///
    /// let base = ContributionBase::new(
    ///     InsuranceType::Medical,
    ///     dec!(35000),
    ///     dec!(3000),
    ///     dec!(30000),
    ///     "shanghai",
    ///     2024,
    /// )
    /// .unwrap();
    ///
    /// let adjusted = base.into_adjusted();
    /// assert_eq!(adjusted.base_amount(), dec!(30000));
    /// assert_eq!(
    ///     adjusted.metadata().get("original_base").map(String::as_str),
    ///     Some("35000"),
    /// );
    /// ```
    pub fn into_adjusted(self) -> Self {
        if !self.needs_adjustment() {
            return self;
        }
        let mut adjusted = self;
        adjusted
            .metadata
            .insert("adjusted".to_string(), "true".to_string());
        adjusted.metadata.insert(
            "original_base".to_string(),
            adjusted.base_amount.to_string(),
        );
        adjusted.base_amount = clamp(
            adjusted.base_amount,
            adjusted.min_amount,
            adjusted.max_amount,
        );
        adjusted
    }
}
