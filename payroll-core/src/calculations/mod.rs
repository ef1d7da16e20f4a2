//! Payroll calculations: gross pay, cumulative withholding and
//! social-insurance contributions.

pub mod common;
pub mod gross_pay;
pub mod social_insurance;
pub mod withholding;

pub use gross_pay::{GrossPay, GrossPayContext, GrossPayError, calculate_gross_pay};
pub use social_insurance::{ContributionCalculator, ContributionError};
pub use withholding::{WithholdingCalculator, WithholdingContext, WithholdingError};
