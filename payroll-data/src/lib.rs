//! Reference regional configuration and rate-table loading for the
//! payroll engine.

pub mod loader;
pub mod regional;

pub use loader::{RegionalRateLoader, RegionalRateLoaderError, RegionalRateRecord};
pub use regional::StaticRegionalConfig;
