//! bikestat - Explore US bikeshare trip data from per-city CSV files
//!
//! This library provides functionality to:
//! - Load a city's trips from CSV and derive month, weekday and hour
//! - Filter trips by month and day of week
//! - Compute time, station, duration and rider statistics
//! - Page through raw rows and render reports as tables or JSON
//! - Drive the interactive explorer over any input/output pair
//!
//! # Examples
//!
//! ```no_run
//! use bikestat::{
//!     aggregation::Aggregator,
//!     config::DatasetCatalog,
//!     data_loader::CsvDatasetSource,
//!     filters::TripFilter,
//!     output::get_formatter,
//!     provider::DatasetSource,
//!     types::{City, TripMonth},
//! };
//!
//! fn main() -> bikestat::Result<()> {
//!     let source = CsvDatasetSource::new(DatasetCatalog::resolve(None));
//!
//!     // Trips started in March, any day of the week
//!     let filter = TripFilter::new().with_month(TripMonth::March);
//!     let dataset = source.load_filtered(City::Chicago, &filter)?;
//!
//!     let report = Aggregator::report(&dataset, &filter);
//!     println!("{}", get_formatter(false).format_report(&report));
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod config;
pub mod data_loader;
pub mod output;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use bikestat_core::{error, filters, provider, types};

// Re-export commonly used types
pub use error::{BikestatError, Result};
pub use types::{City, Dataset, DayChoice, MonthChoice, TripMonth, TripRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
