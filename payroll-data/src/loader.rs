//! CSV loader for regional contribution rate tables.
//!
//! Reads rows of per-region, per-type rates and base bands and builds a
//! [`StaticRegionalConfig`] from them, so a deployment can ship its own
//! regional table instead of the embedded reference one.

use std::io::Read;

use payroll_core::config::{ContributionLimits, InsuranceRates};
use payroll_core::models::InsuranceType;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::regional::StaticRegionalConfig;

/// Errors that can occur when loading regional rate data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionalRateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// The insurance type code is not one of the six known codes.
    #[error("unknown insurance type '{0}'")]
    UnknownInsuranceType(String),

    /// A rate fell outside [0, 1].
    #[error("{field} for {insurance_type} in '{region}' must be between 0 and 1, got {value}")]
    InvalidRate {
        region: String,
        insurance_type: String,
        field: &'static str,
        value: Decimal,
    },

    /// The base band is inverted, empty or negative.
    #[error("invalid base band [{min}, {max}] for {insurance_type} in '{region}'")]
    InvalidBaseBand {
        region: String,
        insurance_type: String,
        min: Decimal,
        max: Decimal,
    },

    /// Years outside the supported contribution range are rejected.
    #[error("year must be between 2020 and 2030, got {0}")]
    YearOutOfRange(i32),
}

impl From<csv::Error> for RegionalRateLoaderError {
    fn from(err: csv::Error) -> Self {
        RegionalRateLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the regional rates CSV file.
///
/// Expected columns:
/// - `region`: region identifier (e.g. `beijing`)
/// - `insurance_type`: one of the six type codes (e.g. `pension`)
/// - `year`: contribution year the base band applies to
/// - `employer_rate` / `employee_rate`: fractions (e.g. `0.16`)
/// - `min_base` / `max_base`: the contribution base band
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegionalRateRecord {
    pub region: String,
    pub insurance_type: String,
    pub year: i32,
    pub employer_rate: Decimal,
    pub employee_rate: Decimal,
    pub min_base: Decimal,
    pub max_base: Decimal,
}

/// Loader for regional rate tables.
pub struct RegionalRateLoader;

impl RegionalRateLoader {
    /// Parse regional rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file
    /// or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RegionalRateRecord>, RegionalRateLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RegionalRateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate records and build a [`StaticRegionalConfig`] from them.
    ///
    /// # Errors
    ///
    /// Returns [`RegionalRateLoaderError`] on the first unknown insurance
    /// type code, out-of-range rate or year, or invalid base band.
    pub fn build(
        records: &[RegionalRateRecord],
    ) -> Result<StaticRegionalConfig, RegionalRateLoaderError> {
        let mut config = StaticRegionalConfig::empty();

        for record in records {
            let insurance_type = InsuranceType::parse(&record.insurance_type).ok_or_else(|| {
                RegionalRateLoaderError::UnknownInsuranceType(record.insurance_type.clone())
            })?;

            for (field, value) in [
                ("employer rate", record.employer_rate),
                ("employee rate", record.employee_rate),
            ] {
                if value < Decimal::ZERO || value > Decimal::ONE {
                    return Err(RegionalRateLoaderError::InvalidRate {
                        region: record.region.clone(),
                        insurance_type: record.insurance_type.clone(),
                        field,
                        value,
                    });
                }
            }

            if record.min_base < Decimal::ZERO || record.max_base <= record.min_base {
                return Err(RegionalRateLoaderError::InvalidBaseBand {
                    region: record.region.clone(),
                    insurance_type: record.insurance_type.clone(),
                    min: record.min_base,
                    max: record.max_base,
                });
            }

            if !(2020..=2030).contains(&record.year) {
                return Err(RegionalRateLoaderError::YearOutOfRange(record.year));
            }

            config.insert_rates(
                &record.region,
                insurance_type,
                InsuranceRates {
                    employer_rate: record.employer_rate,
                    employee_rate: record.employee_rate,
                },
            );
            config.insert_limits(
                &record.region,
                insurance_type,
                record.year,
                ContributionLimits {
                    min_base: record.min_base,
                    max_base: record.max_base,
                },
            );
        }

        Ok(config)
    }
}
