use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The six statutory social-insurance and housing-fund contribution types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InsuranceType {
    Pension,
    Medical,
    Unemployment,
    WorkInjury,
    Maternity,
    HousingFund,
}

impl InsuranceType {
    /// Every contribution type, in statutory order.
    pub const ALL: [InsuranceType; 6] = [
        Self::Pension,
        Self::Medical,
        Self::Unemployment,
        Self::WorkInjury,
        Self::Maternity,
        Self::HousingFund,
    ];

    /// National standard employer rate, used when no regional rate is configured.
    pub fn standard_employer_rate(&self) -> Decimal {
        match self {
            Self::Pension => Decimal::new(16, 2),      // 16%
            Self::Medical => Decimal::new(10, 2),      // 10%
            Self::Unemployment => Decimal::new(8, 3),  // 0.8%
            Self::WorkInjury => Decimal::new(4, 3),    // 0.4%
            Self::Maternity => Decimal::new(8, 3),     // 0.8%
            Self::HousingFund => Decimal::new(12, 2),  // 12%
        }
    }

    /// National standard employee rate, used when no regional rate is configured.
    ///
    /// Work injury and maternity insurance are employer-only; the employee
    /// rate for those types is zero.
    pub fn standard_employee_rate(&self) -> Decimal {
        match self {
            Self::Pension => Decimal::new(8, 2),      // 8%
            Self::Medical => Decimal::new(2, 2),      // 2%
            Self::Unemployment => Decimal::new(2, 3), // 0.2%
            Self::WorkInjury => Decimal::ZERO,
            Self::Maternity => Decimal::ZERO,
            Self::HousingFund => Decimal::new(12, 2), // 12%
        }
    }

    /// Whether the employee-paid share of this type reduces taxable income.
    ///
    /// Only types with a non-zero employee share are deductible.
    pub fn is_tax_deductible(&self) -> bool {
        match self {
            Self::Pension | Self::Medical | Self::Unemployment | Self::HousingFund => true,
            Self::WorkInjury | Self::Maternity => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Medical => "medical",
            Self::Unemployment => "unemployment",
            Self::WorkInjury => "work_injury",
            Self::Maternity => "maternity",
            Self::HousingFund => "housing_fund",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pension" => Some(Self::Pension),
            "medical" => Some(Self::Medical),
            "unemployment" => Some(Self::Unemployment),
            "work_injury" => Some(Self::WorkInjury),
            "maternity" => Some(Self::Maternity),
            "housing_fund" => Some(Self::HousingFund),
            _ => None,
        }
    }
}

impl std::fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
