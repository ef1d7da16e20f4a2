//! Gross pay assembly ahead of withholding.
//!
//! Builds a period's gross income from the employee's monthly base salary
//! (or a period override), worked-day proration and overtime. The
//! statutory average month of 21.75 paid days at 8 hours converts the
//! monthly base into a daily and hourly rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::Employee;

/// Statutory average number of paid days per month.
pub const STANDARD_MONTHLY_WORK_DAYS: Decimal = Decimal::from_parts(2175, 0, 0, false, 2);

/// Standard working hours per paid day.
pub const STANDARD_DAILY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Errors that can occur assembling gross pay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrossPayError {
    #[error("overtime hours must be non-negative, got {0}")]
    NegativeOvertimeHours(Decimal),

    /// Statutory overtime pays at least the ordinary rate.
    #[error("overtime multiplier must be at least 1, got {0}")]
    MultiplierBelowOne(Decimal),

    #[error("worked days must be non-negative, got {0}")]
    NegativeWorkedDays(Decimal),
}

/// Period-specific gross pay inputs, all optional with documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossPayContext {
    /// Replaces the employee's monthly base salary for this period.
    pub base_salary_override: Option<Decimal>,

    /// Overtime hours worked this period. Defaults to 0.
    pub overtime_hours: Decimal,

    /// Multiple of the ordinary hourly rate paid for overtime. Defaults
    /// to 1.5.
    pub overtime_multiplier: Decimal,

    /// Paid days actually worked; days beyond the statutory 21.75 do not
    /// increase pay. Defaults to a full month.
    pub worked_days: Option<Decimal>,
}

impl Default for GrossPayContext {
    fn default() -> Self {
        Self {
            base_salary_override: None,
            overtime_hours: Decimal::ZERO,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
            worked_days: None,
        }
    }
}

/// Assembled gross pay with its intermediate figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossPay {
    /// Monthly base after any override.
    pub monthly_base: Decimal,

    /// Base pay after worked-day proration.
    pub prorated_base: Decimal,

    /// Ordinary hourly rate derived from the monthly base.
    pub hourly_rate: Decimal,

    /// Overtime pay at the ordinary rate times the multiplier.
    pub overtime_pay: Decimal,

    /// Prorated base plus overtime; the period's gross income.
    pub gross_income: Decimal,
}

/// Assembles gross pay for one period.
///
/// # Errors
///
/// Returns [`GrossPayError`] for negative overtime hours or worked days,
/// or an overtime multiplier below 1.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::{GrossPayContext, calculate_gross_pay};
/// use payroll_core::models::Employee;
/// use chrono::NaiveDate;
///
/// let employee = Employee::new(
///     "EMP-001",
///     dec!(8700),
///     NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
///     None,
/// )
/// .unwrap();
///
/// let context = GrossPayContext {
///     overtime_hours: dec!(10),
///     ..GrossPayContext::default()
/// };
///
/// let pay = calculate_gross_pay(&employee, &context).unwrap();
///
/// // Hourly rate 8700 / (21.75 × 8) = 50; overtime 10 × 50 × 1.5 = 750.
/// assert_eq!(pay.overtime_pay, dec!(750.00));
/// assert_eq!(pay.gross_income, dec!(9450.00));
/// ```
pub fn calculate_gross_pay(
    employee: &Employee,
    context: &GrossPayContext,
) -> Result<GrossPay, GrossPayError> {
    if context.overtime_hours < Decimal::ZERO {
        return Err(GrossPayError::NegativeOvertimeHours(context.overtime_hours));
    }
    if context.overtime_multiplier < Decimal::ONE {
        return Err(GrossPayError::MultiplierBelowOne(context.overtime_multiplier));
    }
    if let Some(days) = context.worked_days {
        if days < Decimal::ZERO {
            return Err(GrossPayError::NegativeWorkedDays(days));
        }
    }

    let monthly_base = context
        .base_salary_override
        .unwrap_or_else(|| employee.base_salary());

    let prorated_base = match context.worked_days {
        Some(days) if days < STANDARD_MONTHLY_WORK_DAYS => {
            round_half_up(monthly_base * days / STANDARD_MONTHLY_WORK_DAYS)
        }
        _ => monthly_base,
    };

    let hourly_rate = monthly_base / (STANDARD_MONTHLY_WORK_DAYS * STANDARD_DAILY_HOURS);
    let overtime_pay = round_half_up(
        hourly_rate * context.overtime_hours * context.overtime_multiplier,
    );

    Ok(GrossPay {
        monthly_base,
        prorated_base,
        hourly_rate,
        overtime_pay,
        gross_income: prorated_base + overtime_pay,
    })
}
