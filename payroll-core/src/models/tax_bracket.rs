//! Progressive tax brackets for the cumulative withholding method.
//!
//! The statutory table has seven brackets over cumulative annual taxable
//! income. Each bracket carries a marginal rate and a quick deduction, so
//! tax for an income that lands in a bracket is
//! `income × rate − quick_deduction` rather than a sum over lower brackets.
//!
//! | Level | Taxable income      | Rate | Quick deduction |
//! |-------|---------------------|------|-----------------|
//! | 1     | 0 – 36,000          | 3%   | 0               |
//! | 2     | 36,000 – 144,000    | 10%  | 2,520           |
//! | 3     | 144,000 – 300,000   | 20%  | 16,920          |
//! | 4     | 300,000 – 420,000   | 25%  | 31,920          |
//! | 5     | 420,000 – 660,000   | 30%  | 52,920          |
//! | 6     | 660,000 – 960,000   | 35%  | 85,920          |
//! | 7     | 960,000 – ∞         | 45%  | 181,920         |
//!
//! A bracket's lower bound is exclusive and its upper bound inclusive; the
//! last bracket is unbounded above.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Monthly basic deduction (the "starting point") applied per period.
pub const MONTHLY_BASIC_DEDUCTION: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Annual basic deduction, twelve months of [`MONTHLY_BASIC_DEDUCTION`].
pub const ANNUAL_BASIC_DEDUCTION: Decimal = Decimal::from_parts(60000, 0, 0, false, 0);

/// Errors raised when constructing or validating tax brackets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxBracketError {
    /// Bracket levels run from 1 to 7.
    #[error("bracket level must be between 1 and 7, got {0}")]
    InvalidLevel(u8),

    /// The marginal rate must be a fraction in [0, 1].
    #[error("bracket rate must be between 0 and 1, got {0}")]
    RateOutOfRange(Decimal),

    /// The lower income bound must be non-negative.
    #[error("bracket minimum income must be non-negative, got {0}")]
    NegativeMinIncome(Decimal),

    /// The quick deduction must be non-negative.
    #[error("quick deduction must be non-negative, got {0}")]
    NegativeQuickDeduction(Decimal),

    /// A bounded bracket's upper bound must exceed its lower bound.
    #[error("bracket maximum income {max} must exceed minimum income {min}")]
    EmptyRange { min: Decimal, max: Decimal },

    /// The table must contain exactly seven brackets.
    #[error("bracket table must contain exactly 7 brackets, got {0}")]
    WrongBracketCount(usize),

    /// Adjacent brackets must share a boundary.
    #[error("bracket {level} is not contiguous: previous max {prev_max}, min {min}")]
    NonContiguous {
        level: u8,
        prev_max: Decimal,
        min: Decimal,
    },

    /// Rates must be strictly increasing across the table.
    #[error("bracket {level} rate {rate} does not exceed previous rate {prev_rate}")]
    RateNotIncreasing {
        level: u8,
        prev_rate: Decimal,
        rate: Decimal,
    },

    /// The final bracket must be unbounded above.
    #[error("last bracket must have no maximum income, got {0}")]
    LastBracketBounded(Decimal),

    /// Only the final bracket may be unbounded.
    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBelowTop(u8),
}

/// A single progressive bracket. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    level: u8,
    min_income: Decimal,
    max_income: Option<Decimal>,
    rate: Decimal,
    quick_deduction: Decimal,
}

impl TaxBracket {
    /// Creates a bracket, validating level, bounds, rate and quick deduction.
    ///
    /// # Errors
    ///
    /// Returns [`TaxBracketError`] if the level is outside 1..=7, the rate
    /// is outside [0, 1], a monetary field is negative, or a bounded range
    /// is empty.
    pub fn new(
        level: u8,
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
        quick_deduction: Decimal,
    ) -> Result<Self, TaxBracketError> {
        if !(1..=7).contains(&level) {
            return Err(TaxBracketError::InvalidLevel(level));
        }
        if min_income < Decimal::ZERO {
            return Err(TaxBracketError::NegativeMinIncome(min_income));
        }
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(TaxBracketError::RateOutOfRange(rate));
        }
        if quick_deduction < Decimal::ZERO {
            return Err(TaxBracketError::NegativeQuickDeduction(quick_deduction));
        }
        if let Some(max) = max_income {
            if max <= min_income {
                return Err(TaxBracketError::EmptyRange {
                    min: min_income,
                    max,
                });
            }
        }
        Ok(Self {
            level,
            min_income,
            max_income,
            rate,
            quick_deduction,
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn min_income(&self) -> Decimal {
        self.min_income
    }

    /// Upper bound of the bracket; `None` means unbounded.
    pub fn max_income(&self) -> Option<Decimal> {
        self.max_income
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn quick_deduction(&self) -> Decimal {
        self.quick_deduction
    }

    /// Whether `income` falls inside this bracket.
    ///
    /// The lower bound is exclusive and the upper bound inclusive: income
    /// exactly at `min_income` belongs to the bracket below, income exactly
    /// at `max_income` belongs to this bracket.
    pub fn applies_to(&self, income: Decimal) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }
}

/// The ordered progressive bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Creates a table from already-constructed brackets.
    ///
    /// The brackets are taken in the order given; call [`validate`] to
    /// self-check contiguity and rate monotonicity.
    ///
    /// [`validate`]: BracketTable::validate
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    /// The statutory seven-bracket table for cumulative annual taxable income.
    pub fn statutory() -> Self {
        let row = |level, min: i64, max: Option<i64>, rate_bp: i64, quick: i64| TaxBracket {
            level,
            min_income: Decimal::from(min),
            max_income: max.map(Decimal::from),
            rate: Decimal::new(rate_bp, 2),
            quick_deduction: Decimal::from(quick),
        };
        Self {
            brackets: vec![
                row(1, 0, Some(36_000), 3, 0),
                row(2, 36_000, Some(144_000), 10, 2_520),
                row(3, 144_000, Some(300_000), 20, 16_920),
                row(4, 300_000, Some(420_000), 25, 31_920),
                row(5, 420_000, Some(660_000), 30, 52_920),
                row(6, 660_000, Some(960_000), 35, 85_920),
                row(7, 960_000, None, 45, 181_920),
            ],
        }
    }

    /// All brackets, lowest level first.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Finds the bracket covering `income`, or `None` for income ≤ 0.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::models::BracketTable;
    ///
    /// let table = BracketTable::statutory();
    ///
    /// let bracket = table.find_applicable(dec!(30000)).unwrap();
    /// assert_eq!(bracket.rate(), dec!(0.03));
    ///
    /// // Income at a boundary belongs to the lower bracket.
    /// let bracket = table.find_applicable(dec!(36000)).unwrap();
    /// assert_eq!(bracket.level(), 1);
    ///
    /// assert!(table.find_applicable(dec!(0)).is_none());
    /// ```
    pub fn find_applicable(&self, income: Decimal) -> Option<&TaxBracket> {
        if income <= Decimal::ZERO {
            return None;
        }
        self.brackets.iter().find(|b| b.applies_to(income))
    }

    /// Self-checks the table: exactly seven brackets, contiguous ranges,
    /// strictly increasing rates, unbounded final bracket.
    ///
    /// Intended as a startup or compliance check rather than a per-call
    /// validation.
    pub fn validate(&self) -> Result<(), TaxBracketError> {
        if self.brackets.len() != 7 {
            return Err(TaxBracketError::WrongBracketCount(self.brackets.len()));
        }
        for pair in self.brackets.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match prev.max_income {
                Some(prev_max) if prev_max == next.min_income => {}
                Some(prev_max) => {
                    return Err(TaxBracketError::NonContiguous {
                        level: next.level,
                        prev_max,
                        min: next.min_income,
                    });
                }
                None => {
                    return Err(TaxBracketError::UnboundedBelowTop(prev.level));
                }
            }
            if next.rate <= prev.rate {
                return Err(TaxBracketError::RateNotIncreasing {
                    level: next.level,
                    prev_rate: prev.rate,
                    rate: next.rate,
                });
            }
        }
        match self.brackets.last() {
            Some(last) => match last.max_income {
                None => Ok(()),
                Some(max) => Err(TaxBracketError::LastBracketBounded(max)),
            },
            None => Err(TaxBracketError::WrongBracketCount(0)),
        }
    }
}
