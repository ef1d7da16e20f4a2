//! Cumulative withholding for individual income tax.
//!
//! Tax for a period is not computed from that period's income alone: the
//! year-to-date income is taxed as a whole and tax already withheld in
//! earlier periods is subtracted, so bracket crossings settle themselves
//! month by month.
//!
//! # Method
//!
//! | Step | Computation |
//! |------|-------------|
//! | 1    | Basic deduction = 5,000 × current period |
//! | 2    | Special deductions = Σ declared deduction amounts × current period |
//! | 3    | Cumulative taxable income = max(0, cumulative income − 1 − 2) |
//! | 4    | Applicable bracket for the cumulative taxable income |
//! | 5    | Cumulative tax = taxable × rate − quick deduction |
//! | 6    | Current tax = max(0, cumulative tax − cumulative tax paid) |
//! | 7    | Net income = period taxable income − current tax |
//! | 8    | Marginal rate = bracket rate |
//!
//! The raw cumulative tax of step 5 may be negative; it is floored only at
//! step 6.
//!
//! The engine keeps no history. Callers carry `cumulative_income` and
//! `cumulative_tax_paid` forward from the prior period's result; the only
//! cross-period check made here is that cumulative income covers the
//! current period's income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::calculations::{WithholdingCalculator, WithholdingContext};
//! use payroll_core::models::{Employee, PayrollPeriod};
//! use chrono::NaiveDate;
//!
//! let employee = Employee::new(
//!     "EMP-001",
//!     dec!(8000),
//!     NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
//!     None,
//! )
//! .unwrap();
//!
//! let context = WithholdingContext {
//!     period: Some(PayrollPeriod::new(2024, 1).unwrap()),
//!     ..WithholdingContext::default()
//! };
//!
//! let calculator = WithholdingCalculator::statutory();
//! let result = calculator.calculate(&employee, dec!(8000), &context).unwrap();
//!
//! // 8000 − 5000 = 3000 taxable; 3000 × 3% = 90
//! assert_eq!(result.tax_amount(), dec!(90));
//! assert_eq!(result.net_income(), dec!(7910));
//! assert_eq!(result.marginal_rate(), dec!(0.03));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{max, round_half_up};
use crate::models::{
    BracketTable, Deduction, DeductionType, Employee, MONTHLY_BASIC_DEDUCTION, PayrollPeriod,
    TaxBracketError, TaxFigures, TaxResult, TaxResultError,
};

/// Highest admissible effective tax rate; the top marginal rate.
const MAX_EFFECTIVE_RATE: Decimal = Decimal::from_parts(45, 0, 0, false, 2);

/// Errors that can occur during withholding calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithholdingError {
    /// The period's taxable income must be non-negative.
    #[error("taxable income must be non-negative, got {0}")]
    NegativeTaxableIncome(Decimal),

    /// Periods are numbered 1 through 12 within the tax year.
    #[error("current period must be between 1 and 12, got {0}")]
    PeriodOutOfRange(u32),

    /// Year-to-date income cannot be less than the current period's income.
    #[error("cumulative income {cumulative} is less than current taxable income {current}")]
    CumulativeBelowCurrent { cumulative: Decimal, current: Decimal },

    /// No bracket covers the cumulative taxable income. Cannot happen with
    /// a table whose last bracket is unbounded, but guarded regardless.
    #[error("no tax bracket applicable to cumulative taxable income {0}")]
    NoApplicableBracket(Decimal),

    /// The bracket table failed its self-check.
    #[error(transparent)]
    InvalidBrackets(#[from] TaxBracketError),

    /// The computed figures failed result validation.
    #[error(transparent)]
    InvalidResult(#[from] TaxResultError),

    /// Gross, tax and net figures do not reconcile.
    #[error("result does not reconcile: gross {gross} minus tax {tax} is not net {net}")]
    InconsistentResult {
        gross: Decimal,
        tax: Decimal,
        net: Decimal,
    },

    /// A declared deduction exceeds its statutory cap.
    #[error("{deduction_type} deduction {amount} exceeds statutory cap {cap}")]
    DeductionOverCap {
        deduction_type: DeductionType,
        amount: Decimal,
        cap: Decimal,
    },

    /// The effective tax rate exceeds the top marginal rate.
    #[error("effective tax rate {0} exceeds the {MAX_EFFECTIVE_RATE} ceiling")]
    EffectiveRateTooHigh(Decimal),
}

/// Period-specific context for a withholding calculation.
///
/// Every field has a documented default, replacing the open-ended
/// key-value bag of older payroll systems with a closed set of inputs:
/// unrecognized keys cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingContext {
    /// Ordinal of this period within the tax year, 1..=12. Defaults to 1.
    pub current_period: u32,

    /// Year-to-date taxable income including the current period. Defaults
    /// to the current period's taxable income.
    pub cumulative_income: Option<Decimal>,

    /// Tax already withheld in earlier periods of the year. Defaults to 0.
    pub cumulative_tax_paid: Decimal,

    /// Declared special deductions, applied per month. Defaults to none.
    pub deductions: Vec<Deduction>,

    /// The payroll period being computed. Defaults to the current month.
    pub period: Option<PayrollPeriod>,
}

impl Default for WithholdingContext {
    fn default() -> Self {
        Self {
            current_period: 1,
            cumulative_income: None,
            cumulative_tax_paid: Decimal::ZERO,
            deductions: Vec::new(),
            period: None,
        }
    }
}

/// Calculator for the cumulative withholding method.
#[derive(Debug, Clone)]
pub struct WithholdingCalculator {
    brackets: BracketTable,
}

impl WithholdingCalculator {
    /// Creates a calculator over the given bracket table.
    pub fn new(brackets: BracketTable) -> Self {
        Self { brackets }
    }

    /// Creates a calculator over the statutory seven-bracket table.
    pub fn statutory() -> Self {
        Self::new(BracketTable::statutory())
    }

    pub fn brackets(&self) -> &BracketTable {
        &self.brackets
    }

    /// Computes withholding for one period.
    ///
    /// # Errors
    ///
    /// Returns [`WithholdingError`] if the taxable income is negative, the
    /// period is outside 1..=12, the cumulative income does not cover the
    /// current income, no bracket applies, or the computed figures fail
    /// result validation (for instance a catch-up tax larger than the
    /// period's income).
    pub fn calculate(
        &self,
        employee: &Employee,
        taxable_income: Decimal,
        context: &WithholdingContext,
    ) -> Result<TaxResult, WithholdingError> {
        let cumulative_income = context.cumulative_income.unwrap_or(taxable_income);
        self.validate_inputs(taxable_income, cumulative_income, context)?;

        let current_period = Decimal::from(context.current_period);
        let basic_deduction = MONTHLY_BASIC_DEDUCTION * current_period;
        let special_deductions = self.special_deductions(&context.deductions, current_period);

        let cumulative_taxable_income = max(
            Decimal::ZERO,
            cumulative_income - basic_deduction - special_deductions,
        );

        // Nothing taxable yet: no bracket applies and the cumulative tax
        // is zero by definition.
        let (cumulative_tax, marginal_rate) = if cumulative_taxable_income <= Decimal::ZERO {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let bracket = self
                .brackets
                .find_applicable(cumulative_taxable_income)
                .ok_or(WithholdingError::NoApplicableBracket(
                    cumulative_taxable_income,
                ))?;
            (
                cumulative_taxable_income * bracket.rate() - bracket.quick_deduction(),
                bracket.rate(),
            )
        };

        let tax_amount = round_half_up(max(
            Decimal::ZERO,
            cumulative_tax - context.cumulative_tax_paid,
        ));
        let net_income = taxable_income - tax_amount;

        let result = TaxResult::new(TaxFigures {
            employee_number: employee.employee_number().to_string(),
            period: context.period.unwrap_or_else(PayrollPeriod::current),
            current_period: context.current_period,
            gross_income: taxable_income,
            taxable_income,
            tax_amount,
            net_income,
            cumulative_income,
            cumulative_tax_paid: context.cumulative_tax_paid,
            cumulative_taxable_income,
            cumulative_tax,
            marginal_rate,
            deductions: context.deductions.clone(),
        })?;
        Ok(result)
    }

    /// Re-checks a computed result against the statutory constraints:
    /// bracket table self-check, figure reconciliation, deduction caps and
    /// the effective-rate ceiling.
    pub fn validate_compliance(&self, result: &TaxResult) -> Result<(), WithholdingError> {
        self.brackets.validate()?;

        if !result.is_valid() {
            return Err(WithholdingError::InconsistentResult {
                gross: result.gross_income(),
                tax: result.tax_amount(),
                net: result.net_income(),
            });
        }

        for deduction in result.deductions() {
            if !deduction.within_cap() {
                return Err(WithholdingError::DeductionOverCap {
                    deduction_type: deduction.deduction_type(),
                    amount: deduction.amount(),
                    cap: deduction.deduction_type().declared_cap(),
                });
            }
        }

        let effective_rate = result.effective_tax_rate();
        if effective_rate > MAX_EFFECTIVE_RATE {
            return Err(WithholdingError::EffectiveRateTooHigh(effective_rate));
        }

        Ok(())
    }

    fn validate_inputs(
        &self,
        taxable_income: Decimal,
        cumulative_income: Decimal,
        context: &WithholdingContext,
    ) -> Result<(), WithholdingError> {
        if taxable_income < Decimal::ZERO {
            return Err(WithholdingError::NegativeTaxableIncome(taxable_income));
        }
        if !(1..=12).contains(&context.current_period) {
            return Err(WithholdingError::PeriodOutOfRange(context.current_period));
        }
        if cumulative_income < taxable_income {
            return Err(WithholdingError::CumulativeBelowCurrent {
                cumulative: cumulative_income,
                current: taxable_income,
            });
        }
        Ok(())
    }

    /// Declared monthly deduction amounts scaled to the cumulative period.
    fn special_deductions(
        &self,
        deductions: &[Deduction],
        current_period: Decimal,
    ) -> Decimal {
        let monthly: Decimal = deductions.iter().map(Deduction::amount).sum();
        monthly * current_period
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::TaxBracket;

    use super::*;

    fn employee() -> Employee {
        Employee::new(
            "EMP-001",
            dec!(12000),
            NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
            Some("110101199001011234".to_string()),
        )
        .unwrap()
    }

    fn context(period: u32, cumulative: Decimal, paid: Decimal) -> WithholdingContext {
        WithholdingContext {
            current_period: period,
            cumulative_income: Some(cumulative),
            cumulative_tax_paid: paid,
            deductions: Vec::new(),
            period: Some(PayrollPeriod::new(2024, period).unwrap()),
        }
    }

    // =========================================================================
    // input validation
    // =========================================================================

    #[test]
    fn calculate_rejects_negative_taxable_income() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator.calculate(
            &employee(),
            dec!(-1),
            &context(1, dec!(0), dec!(0)),
        );

        assert_eq!(result, Err(WithholdingError::NegativeTaxableIncome(dec!(-1))));
    }

    #[test]
    fn calculate_rejects_period_zero() {
        let calculator = WithholdingCalculator::statutory();
        let context = WithholdingContext {
            current_period: 0,
            ..WithholdingContext::default()
        };

        let result = calculator.calculate(&employee(), dec!(8000), &context);

        assert_eq!(result, Err(WithholdingError::PeriodOutOfRange(0)));
    }

    #[test]
    fn calculate_rejects_period_thirteen() {
        let calculator = WithholdingCalculator::statutory();
        let context = WithholdingContext {
            current_period: 13,
            ..WithholdingContext::default()
        };

        let result = calculator.calculate(&employee(), dec!(8000), &context);

        assert_eq!(result, Err(WithholdingError::PeriodOutOfRange(13)));
    }

    #[test]
    fn calculate_accepts_boundary_periods() {
        let calculator = WithholdingCalculator::statutory();

        assert!(
            calculator
                .calculate(&employee(), dec!(8000), &context(1, dec!(8000), dec!(0)))
                .is_ok()
        );
        assert!(
            calculator
                .calculate(&employee(), dec!(8000), &context(12, dec!(96000), dec!(990)))
                .is_ok()
        );
    }

    #[test]
    fn calculate_rejects_cumulative_below_current() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator.calculate(
            &employee(),
            dec!(8000),
            &context(2, dec!(5000), dec!(0)),
        );

        assert_eq!(
            result,
            Err(WithholdingError::CumulativeBelowCurrent {
                cumulative: dec!(5000),
                current: dec!(8000),
            })
        );
    }

    // =========================================================================
    // scenarios
    // =========================================================================

    #[test]
    fn first_period_simple_withholding() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(8000), &context(1, dec!(8000), dec!(0)))
            .unwrap();

        // 8000 − 5000 = 3000; 3000 × 3% = 90
        assert_eq!(result.tax_amount(), dec!(90.00));
        assert_eq!(result.net_income(), dec!(7910.00));
        assert_eq!(result.marginal_rate(), dec!(0.03));
        assert_eq!(result.cumulative_taxable_income(), dec!(3000));
        assert!(result.is_valid());
    }

    #[test]
    fn deductions_reduce_the_taxable_base() {
        let calculator = WithholdingCalculator::statutory();
        let mut context = context(1, dec!(12000), dec!(0));
        context.deductions = vec![
            Deduction::new(DeductionType::HousingRent, dec!(1500), "").unwrap(),
            Deduction::new(DeductionType::ChildEducation, dec!(1500), "").unwrap(),
        ];

        let result = calculator
            .calculate(&employee(), dec!(12000), &context)
            .unwrap();

        // 12000 − 5000 − 3000 = 4000; 4000 × 3% = 120
        assert_eq!(result.tax_amount(), dec!(120.00));
        assert_eq!(result.net_income(), dec!(11880.00));
        assert_eq!(result.deductions().len(), 2);
    }

    #[test]
    fn second_period_subtracts_tax_already_paid() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(15000), &context(2, dec!(23000), dec!(90)))
            .unwrap();

        // Cumulative taxable: 23000 − 10000 = 13000; cumulative tax 390;
        // current tax 390 − 90 = 300.
        assert_eq!(result.cumulative_taxable_income(), dec!(13000));
        assert_eq!(result.cumulative_tax(), dec!(390.00));
        assert_eq!(result.tax_amount(), dec!(300.00));
        assert_eq!(result.net_income(), dec!(14700.00));
    }

    #[test]
    fn deductions_scale_with_the_period() {
        let calculator = WithholdingCalculator::statutory();
        let mut context = context(3, dec!(36000), dec!(0));
        context.deductions =
            vec![Deduction::new(DeductionType::ElderCare, dec!(2000), "").unwrap()];

        let result = calculator
            .calculate(&employee(), dec!(12000), &context)
            .unwrap();

        // 36000 − 15000 − 6000 = 15000; 15000 × 3% = 450
        assert_eq!(result.cumulative_taxable_income(), dec!(15000));
        assert_eq!(result.tax_amount(), dec!(450.00));
    }

    #[test]
    fn crossing_into_the_second_bracket_uses_the_quick_deduction() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(
                &employee(),
                dec!(30000),
                &context(2, dec!(60000), dec!(750)),
            )
            .unwrap();

        // Cumulative taxable: 60000 − 10000 = 50000 → bracket 2.
        // Cumulative tax: 50000 × 10% − 2520 = 2480; current 2480 − 750.
        assert_eq!(result.marginal_rate(), dec!(0.10));
        assert_eq!(result.tax_amount(), dec!(1730.00));
    }

    // =========================================================================
    // defaults
    // =========================================================================

    #[test]
    fn cumulative_income_defaults_to_taxable_income() {
        let calculator = WithholdingCalculator::statutory();
        let context = WithholdingContext {
            period: Some(PayrollPeriod::new(2024, 1).unwrap()),
            ..WithholdingContext::default()
        };

        let result = calculator
            .calculate(&employee(), dec!(8000), &context)
            .unwrap();

        assert_eq!(result.cumulative_income(), dec!(8000));
        assert_eq!(result.tax_amount(), dec!(90.00));
    }

    #[test]
    fn result_carries_the_raw_inputs() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(15000), &context(2, dec!(23000), dec!(90)))
            .unwrap();

        assert_eq!(result.employee_number(), "EMP-001");
        assert_eq!(result.current_period(), 2);
        assert_eq!(result.period().key(), "2024-02");
        assert_eq!(result.cumulative_income(), dec!(23000));
        assert_eq!(result.cumulative_tax_paid(), dec!(90));
    }

    // =========================================================================
    // edge cases
    // =========================================================================

    #[test]
    fn income_below_deductions_yields_zero_tax_and_no_bracket() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(4000), &context(1, dec!(4000), dec!(0)))
            .unwrap();

        assert_eq!(result.cumulative_taxable_income(), dec!(0));
        assert_eq!(result.tax_amount(), dec!(0));
        assert_eq!(result.net_income(), dec!(4000));
        assert_eq!(result.marginal_rate(), dec!(0));
    }

    #[test]
    fn overpaid_cumulative_tax_floors_current_tax_at_zero() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(8000), &context(2, dec!(16000), dec!(500)))
            .unwrap();

        // Cumulative tax 6000 × 3% = 180 < 500 already paid.
        assert_eq!(result.tax_amount(), dec!(0));
        assert_eq!(result.net_income(), dec!(8000));
    }

    #[test]
    fn negative_raw_cumulative_tax_is_kept_and_floored_late() {
        // A table whose second bracket carries a quick deduction larger
        // than income × rate just above the boundary.
        let brackets = BracketTable::new(vec![
            TaxBracket::new(1, dec!(0), Some(dec!(1000)), dec!(0.03), dec!(0)).unwrap(),
            TaxBracket::new(2, dec!(1000), None, dec!(0.10), dec!(500)).unwrap(),
        ]);
        let calculator = WithholdingCalculator::new(brackets);

        let result = calculator
            .calculate(&employee(), dec!(6001), &context(1, dec!(6001), dec!(0)))
            .unwrap();

        // Cumulative taxable 1001 → 1001 × 10% − 500 = −399.9
        assert_eq!(result.cumulative_tax(), dec!(-399.9));
        assert_eq!(result.tax_amount(), dec!(0));
        assert_eq!(result.net_income(), dec!(6001));
    }

    #[test]
    fn catch_up_tax_exceeding_period_income_fails_result_validation() {
        let calculator = WithholdingCalculator::statutory();

        // Tiny current income against a huge untaxed cumulative base.
        let result = calculator.calculate(
            &employee(),
            dec!(1000),
            &context(2, dec!(500000), dec!(0)),
        );

        assert!(matches!(
            result,
            Err(WithholdingError::InvalidResult(
                TaxResultError::NegativeFigure { field: "net income", .. }
            ))
        ));
    }

    // =========================================================================
    // compliance
    // =========================================================================

    #[test]
    fn compliant_result_passes_validation() {
        let calculator = WithholdingCalculator::statutory();

        let result = calculator
            .calculate(&employee(), dec!(8000), &context(1, dec!(8000), dec!(0)))
            .unwrap();

        assert_eq!(calculator.validate_compliance(&result), Ok(()));
    }

    #[test]
    fn compliance_rejects_invalid_bracket_table() {
        let calculator = WithholdingCalculator::new(BracketTable::new(vec![
            TaxBracket::new(1, dec!(0), None, dec!(0.03), dec!(0)).unwrap(),
        ]));
        let statutory = WithholdingCalculator::statutory();

        let result = statutory
            .calculate(&employee(), dec!(8000), &context(1, dec!(8000), dec!(0)))
            .unwrap();

        assert_eq!(
            calculator.validate_compliance(&result),
            Err(WithholdingError::InvalidBrackets(
                TaxBracketError::WrongBracketCount(1)
            ))
        );
    }

    #[test]
    fn compliance_rejects_effective_rate_above_ceiling() {
        let calculator = WithholdingCalculator::statutory();

        // Hand-built figures: tax of 60% of gross reconciles but breaches
        // the effective-rate ceiling.
        let result = TaxResult::new(TaxFigures {
            employee_number: "EMP-001".to_string(),
            period: PayrollPeriod::new(2024, 1).unwrap(),
            current_period: 1,
            gross_income: dec!(1000),
            taxable_income: dec!(1000),
            tax_amount: dec!(600),
            net_income: dec!(400),
            cumulative_income: dec!(1000),
            cumulative_tax_paid: dec!(0),
            cumulative_taxable_income: dec!(0),
            cumulative_tax: dec!(0),
            marginal_rate: dec!(0.45),
            deductions: Vec::new(),
        })
        .unwrap();

        assert_eq!(
            calculator.validate_compliance(&result),
            Err(WithholdingError::EffectiveRateTooHigh(dec!(0.6)))
        );
    }
}
