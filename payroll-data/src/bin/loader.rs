use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::config::RegionalConfigProvider;
use payroll_core::models::InsuranceType;
use payroll_data::RegionalRateLoader;

/// Parse and validate a regional contribution rate CSV file.
///
/// The CSV file should have the following columns:
/// - region: region identifier (e.g. beijing)
/// - insurance_type: pension, medical, unemployment, work_injury,
///   maternity or housing_fund
/// - year: contribution year for the base band
/// - employer_rate / employee_rate: fractions (e.g. 0.16)
/// - min_base / max_base: contribution base band
#[derive(Parser, Debug)]
#[command(name = "payroll-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing regional rate data
    #[arg(short, long)]
    file: PathBuf,

    /// Print the full rate table for one region after validation
    #[arg(short, long)]
    region: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading regional rates from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = RegionalRateLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let config = RegionalRateLoader::build(&records)
        .context("Failed to validate regional rate records")?;

    let regions = config.supported_regions();
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();

    println!(
        "Validated {} records covering {} regions and {} years.",
        records.len(),
        regions.len(),
        years.len()
    );
    println!("Regions: {}", regions.join(", "));

    if let Some(region) = &args.region {
        println!();
        println!("Rates for '{region}':");
        for insurance_type in InsuranceType::ALL {
            let rates = config
                .insurance_rates(region, insurance_type)
                .with_context(|| format!("Failed to resolve rates for {insurance_type}"))?;
            println!(
                "  {:<14} employer {:>7}  employee {:>7}",
                insurance_type.as_str(),
                rates.employer_rate,
                rates.employee_rate
            );
        }
    }

    Ok(())
}
