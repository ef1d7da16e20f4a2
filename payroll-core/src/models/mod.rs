mod contribution_base;
mod deduction;
mod employee;
mod insurance_result;
mod insurance_type;
mod payroll_period;
mod tax_bracket;
mod tax_result;

pub use contribution_base::{ContributionBase, ContributionBaseError};
pub use deduction::{Deduction, DeductionError, DeductionType};
pub use employee::{Employee, EmployeeError};
pub use insurance_result::{InsuranceResultError, SocialInsuranceResult};
pub use insurance_type::InsuranceType;
pub use payroll_period::{PayrollPeriod, PayrollPeriodError};
pub use tax_bracket::{
    ANNUAL_BASIC_DEDUCTION, BracketTable, MONTHLY_BASIC_DEDUCTION, TaxBracket, TaxBracketError,
};
pub use tax_result::{TaxFigures, TaxResult, TaxResultError};
