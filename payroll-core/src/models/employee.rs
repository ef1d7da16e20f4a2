use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing an [`Employee`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmployeeError {
    #[error("employee number must not be empty")]
    EmptyEmployeeNumber,

    #[error("base salary must be non-negative, got {0}")]
    NegativeBaseSalary(Decimal),
}

/// Employee record as supplied by the collaborating HR system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    employee_number: String,
    base_salary: Decimal,
    hire_date: NaiveDate,
    id_number: Option<String>,
}

impl Employee {
    pub fn new(
        employee_number: impl Into<String>,
        base_salary: Decimal,
        hire_date: NaiveDate,
        id_number: Option<String>,
    ) -> Result<Self, EmployeeError> {
        let employee_number = employee_number.into();
        if employee_number.trim().is_empty() {
            return Err(EmployeeError::EmptyEmployeeNumber);
        }
        if base_salary < Decimal::ZERO {
            return Err(EmployeeError::NegativeBaseSalary(base_salary));
        }
        Ok(Self {
            employee_number,
            base_salary,
            hire_date,
            id_number,
        })
    }

    pub fn employee_number(&self) -> &str {
        &self.employee_number
    }

    pub fn base_salary(&self) -> Decimal {
        self.base_salary
    }

    pub fn hire_date(&self) -> NaiveDate {
        self.hire_date
    }

    pub fn id_number(&self) -> Option<&str> {
        self.id_number.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn hire_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 7, 1).unwrap()
    }

    #[test]
    fn new_accepts_valid_employee() {
        let employee = Employee::new("EMP-001", dec!(12000), hire_date(), None).unwrap();

        assert_eq!(employee.employee_number(), "EMP-001");
        assert_eq!(employee.base_salary(), dec!(12000));
        assert_eq!(employee.id_number(), None);
    }

    #[test]
    fn new_rejects_empty_employee_number() {
        let result = Employee::new("  ", dec!(12000), hire_date(), None);

        assert_eq!(result, Err(EmployeeError::EmptyEmployeeNumber));
    }

    #[test]
    fn new_rejects_negative_base_salary() {
        let result = Employee::new("EMP-001", dec!(-1), hire_date(), None);

        assert_eq!(result, Err(EmployeeError::NegativeBaseSalary(dec!(-1))));
    }
}
