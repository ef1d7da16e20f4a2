//! Computed withholding result for a single payroll period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::deduction::Deduction;
use super::payroll_period::PayrollPeriod;
use crate::calculations::common::amounts_agree;

/// Errors raised when constructing a [`TaxResult`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxResultError {
    /// Period monetary figures must be non-negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeFigure { field: &'static str, value: Decimal },

    /// The marginal rate is a fraction in [0, 1].
    #[error("marginal rate must be between 0 and 1, got {0}")]
    MarginalRateOutOfRange(Decimal),
}

/// The figures assembled by the withholding calculator for one period.
///
/// `cumulative_tax` is the raw `income × rate − quick_deduction` value and
/// may be negative; everything else is period- or cumulative-level money
/// and must be non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFigures {
    pub employee_number: String,
    pub period: PayrollPeriod,
    pub current_period: u32,
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub tax_amount: Decimal,
    pub net_income: Decimal,
    pub cumulative_income: Decimal,
    pub cumulative_tax_paid: Decimal,
    pub cumulative_taxable_income: Decimal,
    pub cumulative_tax: Decimal,
    pub marginal_rate: Decimal,
    pub deductions: Vec<Deduction>,
}

/// Immutable withholding result. Constructed once per calculation call,
/// validated on construction, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    figures: TaxFigures,
}

impl TaxResult {
    /// Validates and freezes a set of computed figures.
    ///
    /// # Errors
    ///
    /// Returns [`TaxResultError`] if a period or cumulative monetary figure
    /// is negative, or the marginal rate is outside [0, 1].
    pub fn new(figures: TaxFigures) -> Result<Self, TaxResultError> {
        for (field, value) in [
            ("gross income", figures.gross_income),
            ("taxable income", figures.taxable_income),
            ("tax amount", figures.tax_amount),
            ("net income", figures.net_income),
            ("cumulative income", figures.cumulative_income),
            ("cumulative tax paid", figures.cumulative_tax_paid),
            ("cumulative taxable income", figures.cumulative_taxable_income),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxResultError::NegativeFigure { field, value });
            }
        }
        if figures.marginal_rate < Decimal::ZERO || figures.marginal_rate > Decimal::ONE {
            return Err(TaxResultError::MarginalRateOutOfRange(figures.marginal_rate));
        }
        Ok(Self { figures })
    }

    pub fn employee_number(&self) -> &str {
        &self.figures.employee_number
    }

    pub fn period(&self) -> PayrollPeriod {
        self.figures.period
    }

    /// Ordinal of this period within the tax year (1..=12).
    pub fn current_period(&self) -> u32 {
        self.figures.current_period
    }

    pub fn gross_income(&self) -> Decimal {
        self.figures.gross_income
    }

    pub fn taxable_income(&self) -> Decimal {
        self.figures.taxable_income
    }

    /// Tax withheld for this period.
    pub fn tax_amount(&self) -> Decimal {
        self.figures.tax_amount
    }

    pub fn net_income(&self) -> Decimal {
        self.figures.net_income
    }

    pub fn cumulative_income(&self) -> Decimal {
        self.figures.cumulative_income
    }

    pub fn cumulative_tax_paid(&self) -> Decimal {
        self.figures.cumulative_tax_paid
    }

    pub fn cumulative_taxable_income(&self) -> Decimal {
        self.figures.cumulative_taxable_income
    }

    /// Raw cumulative tax before subtracting tax already paid; may be
    /// negative when the quick deduction exceeds `income × rate`.
    pub fn cumulative_tax(&self) -> Decimal {
        self.figures.cumulative_tax
    }

    pub fn marginal_rate(&self) -> Decimal {
        self.figures.marginal_rate
    }

    pub fn deductions(&self) -> &[Deduction] {
        &self.figures.deductions
    }

    /// Tax as a share of gross income; zero for a zero gross.
    pub fn effective_tax_rate(&self) -> Decimal {
        if self.figures.gross_income.is_zero() {
            Decimal::ZERO
        } else {
            self.figures.tax_amount / self.figures.gross_income
        }
    }

    /// Whether gross, tax and net figures reconcile within the 0.01
    /// monetary tolerance.
    pub fn is_valid(&self) -> bool {
        amounts_agree(
            self.figures.gross_income - self.figures.tax_amount,
            self.figures.net_income,
        )
    }
}
