//! Embedded reference regional configuration.
//!
//! Carries contribution rates and base bands for a national `default`
//! entry and four municipalities. Lookups degrade instead of failing:
//! unknown regions fall back to the `default` entry, unknown years to the
//! most recent configured band, and as a last resort to the insurance
//! type's statutory standard rates and a national base band. A lookup
//! through this provider never errors.

use std::collections::BTreeMap;

use payroll_core::config::{
    ConfigError, ContributionLimits, InsuranceRates, RegionalConfigProvider,
};
use payroll_core::models::InsuranceType;
use rust_decimal::Decimal;

const DEFAULT_REGION: &str = "default";

/// National fallback band applied when no configured band matches.
const NATIONAL_MIN_BASE: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);
const NATIONAL_MAX_BASE: Decimal = Decimal::from_parts(35000, 0, 0, false, 0);

/// In-memory regional configuration table.
#[derive(Debug, Clone, Default)]
pub struct StaticRegionalConfig {
    rates: BTreeMap<(String, InsuranceType), InsuranceRates>,
    limits: BTreeMap<(String, InsuranceType, i32), ContributionLimits>,
    regions: Vec<String>,
}

impl StaticRegionalConfig {
    /// An empty table; entries are added with [`insert_rates`] and
    /// [`insert_limits`].
    ///
    /// [`insert_rates`]: StaticRegionalConfig::insert_rates
    /// [`insert_limits`]: StaticRegionalConfig::insert_limits
    pub fn empty() -> Self {
        Self::default()
    }

    /// The reference table: a national `default` entry plus beijing,
    /// shanghai, guangzhou and shenzhen, with base bands for 2023–2025.
    pub fn embedded() -> Self {
        let mut config = Self::empty();

        let pct = |n: i64, scale: u32| Decimal::new(n, scale);

        // Per-region rates: (type, employer, employee).
        let regional_rates: [(&str, [(InsuranceType, Decimal, Decimal); 6]); 5] = [
            (
                DEFAULT_REGION,
                [
                    (InsuranceType::Pension, pct(16, 2), pct(8, 2)),
                    (InsuranceType::Medical, pct(10, 2), pct(2, 2)),
                    (InsuranceType::Unemployment, pct(8, 3), pct(2, 3)),
                    (InsuranceType::WorkInjury, pct(4, 3), Decimal::ZERO),
                    (InsuranceType::Maternity, pct(8, 3), Decimal::ZERO),
                    (InsuranceType::HousingFund, pct(12, 2), pct(12, 2)),
                ],
            ),
            (
                "beijing",
                [
                    (InsuranceType::Pension, pct(16, 2), pct(8, 2)),
                    (InsuranceType::Medical, pct(98, 3), pct(2, 2)),
                    (InsuranceType::Unemployment, pct(5, 3), pct(5, 3)),
                    (InsuranceType::WorkInjury, pct(4, 3), Decimal::ZERO),
                    (InsuranceType::Maternity, pct(8, 3), Decimal::ZERO),
                    (InsuranceType::HousingFund, pct(12, 2), pct(12, 2)),
                ],
            ),
            (
                "shanghai",
                [
                    (InsuranceType::Pension, pct(16, 2), pct(8, 2)),
                    (InsuranceType::Medical, pct(105, 3), pct(2, 2)),
                    (InsuranceType::Unemployment, pct(5, 3), pct(5, 3)),
                    (InsuranceType::WorkInjury, pct(26, 4), Decimal::ZERO),
                    (InsuranceType::Maternity, pct(1, 2), Decimal::ZERO),
                    (InsuranceType::HousingFund, pct(7, 2), pct(7, 2)),
                ],
            ),
            (
                "guangzhou",
                [
                    (InsuranceType::Pension, pct(15, 2), pct(8, 2)),
                    (InsuranceType::Medical, pct(685, 4), pct(2, 2)),
                    (InsuranceType::Unemployment, pct(64, 4), pct(2, 3)),
                    (InsuranceType::WorkInjury, pct(2, 3), Decimal::ZERO),
                    (InsuranceType::Maternity, pct(85, 4), Decimal::ZERO),
                    (InsuranceType::HousingFund, pct(5, 2), pct(5, 2)),
                ],
            ),
            (
                "shenzhen",
                [
                    (InsuranceType::Pension, pct(14, 2), pct(8, 2)),
                    (InsuranceType::Medical, pct(52, 3), pct(2, 2)),
                    (InsuranceType::Unemployment, pct(7, 3), pct(3, 3)),
                    (InsuranceType::WorkInjury, pct(14, 4), Decimal::ZERO),
                    (InsuranceType::Maternity, pct(45, 4), Decimal::ZERO),
                    (InsuranceType::HousingFund, pct(5, 2), pct(5, 2)),
                ],
            ),
        ];

        for (region, rates) in regional_rates {
            for (insurance_type, employer_rate, employee_rate) in rates {
                config.insert_rates(
                    region,
                    insurance_type,
                    InsuranceRates {
                        employer_rate,
                        employee_rate,
                    },
                );
            }
        }

        // Per-region base bands: (year, min, max), applied to every type.
        let regional_bands: [(&str, [(i32, i64, i64); 3]); 5] = [
            (
                DEFAULT_REGION,
                [(2023, 4000, 24000), (2024, 4200, 25000), (2025, 4500, 26000)],
            ),
            (
                "beijing",
                [(2023, 5869, 31884), (2024, 6326, 33891), (2025, 6821, 35283)],
            ),
            (
                "shanghai",
                [(2023, 7310, 36549), (2024, 7384, 36921), (2025, 7384, 36921)],
            ),
            (
                "guangzhou",
                [(2023, 5284, 26421), (2024, 5500, 28000), (2025, 5626, 28770)],
            ),
            (
                "shenzhen",
                [(2023, 3523, 26421), (2024, 3600, 27500), (2025, 3800, 28400)],
            ),
        ];

        for (region, bands) in regional_bands {
            for (year, min, max) in bands {
                for insurance_type in InsuranceType::ALL {
                    config.insert_limits(
                        region,
                        insurance_type,
                        year,
                        ContributionLimits {
                            min_base: Decimal::from(min),
                            max_base: Decimal::from(max),
                        },
                    );
                }
            }
        }

        config
    }

    /// Registers rates for a region and insurance type, replacing any
    /// previous entry.
    pub fn insert_rates(
        &mut self,
        region: &str,
        insurance_type: InsuranceType,
        rates: InsuranceRates,
    ) {
        let region = normalize(region);
        self.register_region(&region);
        self.rates.insert((region, insurance_type), rates);
    }

    /// Registers a base band for a region, insurance type and year,
    /// replacing any previous entry.
    pub fn insert_limits(
        &mut self,
        region: &str,
        insurance_type: InsuranceType,
        year: i32,
        limits: ContributionLimits,
    ) {
        let region = normalize(region);
        self.register_region(&region);
        self.limits.insert((region, insurance_type, year), limits);
    }

    fn register_region(&mut self, region: &str) {
        if !self.regions.iter().any(|r| r == region) {
            self.regions.push(region.to_string());
            self.regions.sort_unstable();
        }
    }

    /// Most recent configured band for the default region and type, used
    /// when the requested year has no entry.
    fn latest_default_band(&self, insurance_type: InsuranceType) -> Option<ContributionLimits> {
        self.limits
            .range(
                (DEFAULT_REGION.to_string(), insurance_type, i32::MIN)
                    ..=(DEFAULT_REGION.to_string(), insurance_type, i32::MAX),
            )
            .next_back()
            .map(|(_, limits)| *limits)
    }
}

fn normalize(region: &str) -> String {
    region.trim().to_lowercase()
}

impl RegionalConfigProvider for StaticRegionalConfig {
    fn insurance_rates(
        &self,
        region: &str,
        insurance_type: InsuranceType,
    ) -> Result<InsuranceRates, ConfigError> {
        let region = normalize(region);
        let rates = self
            .rates
            .get(&(region, insurance_type))
            .or_else(|| {
                self.rates
                    .get(&(DEFAULT_REGION.to_string(), insurance_type))
            })
            .copied()
            .unwrap_or_else(|| InsuranceRates {
                employer_rate: insurance_type.standard_employer_rate(),
                employee_rate: insurance_type.standard_employee_rate(),
            });
        Ok(rates)
    }

    fn contribution_limits(
        &self,
        region: &str,
        insurance_type: InsuranceType,
        year: i32,
    ) -> Result<ContributionLimits, ConfigError> {
        let region = normalize(region);
        let limits = self
            .limits
            .get(&(region, insurance_type, year))
            .or_else(|| {
                self.limits
                    .get(&(DEFAULT_REGION.to_string(), insurance_type, year))
            })
            .copied()
            .or_else(|| self.latest_default_band(insurance_type))
            .unwrap_or(ContributionLimits {
                min_base: NATIONAL_MIN_BASE,
                max_base: NATIONAL_MAX_BASE,
            });
        Ok(limits)
    }

    fn supported_regions(&self) -> Vec<String> {
        self.regions.clone()
    }
}
