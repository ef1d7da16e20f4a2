use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`PayrollPeriod`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollPeriodError {
    #[error("payroll year must be between 1900 and 3000, got {0}")]
    YearOutOfRange(i32),

    #[error("payroll month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
}

/// A payroll period identified by calendar year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    year: i32,
    month: u32,
}

impl PayrollPeriod {
    /// Creates a period, validating year (1900..=3000) and month (1..=12).
    pub fn new(year: i32, month: u32) -> Result<Self, PayrollPeriodError> {
        if !(1900..=3000).contains(&year) {
            return Err(PayrollPeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PayrollPeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The period containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Canonical `YYYY-MM` key for this period.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// First day of the period.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("year and month validated at construction")
    }

    /// Last day of the period.
    pub fn end_date(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("year and month validated at construction")
            .pred_opt()
            .expect("first of month always has a predecessor")
    }

    /// Number of calendar days in the period.
    pub fn days_in_month(&self) -> u32 {
        self.end_date().day()
    }
}

impl std::fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_rejects_month_zero() {
        assert_eq!(
            PayrollPeriod::new(2024, 0),
            Err(PayrollPeriodError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn new_rejects_month_thirteen() {
        assert_eq!(
            PayrollPeriod::new(2024, 13),
            Err(PayrollPeriodError::MonthOutOfRange(13))
        );
    }

    #[test]
    fn new_rejects_year_out_of_range() {
        assert_eq!(
            PayrollPeriod::new(1899, 6),
            Err(PayrollPeriodError::YearOutOfRange(1899))
        );
        assert_eq!(
            PayrollPeriod::new(3001, 6),
            Err(PayrollPeriodError::YearOutOfRange(3001))
        );
    }

    #[test]
    fn key_is_zero_padded() {
        let period = PayrollPeriod::new(2024, 3).unwrap();

        assert_eq!(period.key(), "2024-03");
    }

    #[test]
    fn start_and_end_dates_span_the_month() {
        let period = PayrollPeriod::new(2024, 2).unwrap();

        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn days_in_month_handles_leap_february() {
        assert_eq!(PayrollPeriod::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(PayrollPeriod::new(2023, 2).unwrap().days_in_month(), 28);
    }

    #[test]
    fn december_end_date_rolls_into_next_year() {
        let period = PayrollPeriod::new(2024, 12).unwrap();

        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(period.days_in_month(), 31);
    }
}
