//! Basic usage example for bikestat
//!
//! This example loads one city's trips, narrows them to a month and a
//! weekday, and prints the statistics tables.
//!
//! Run with the data directory holding the city CSVs:
//!
//! ```bash
//! BIKESTAT_DATA_PATH=tests/fixtures cargo run --example basic_usage
//! ```

use bikestat::{
    Result,
    aggregation::Aggregator,
    config::DatasetCatalog,
    data_loader::CsvDatasetSource,
    filters::TripFilter,
    output::get_formatter,
    provider::DatasetSource,
    types::{City, TripMonth},
};
use chrono::Weekday;

fn main() -> Result<()> {
    let catalog = DatasetCatalog::resolve(None);
    println!("Reading datasets from {}", catalog.data_dir().display());

    let source = CsvDatasetSource::new(catalog);

    // Mondays in March
    let filter = TripFilter::new()
        .with_month(TripMonth::March)
        .with_weekday(Weekday::Mon);

    let dataset = source.load_filtered(City::Chicago, &filter)?;
    println!("{} trips match {}", dataset.len(), filter);

    let report = Aggregator::report(&dataset, &filter);
    println!("{}", get_formatter(false).format_report(&report));

    Ok(())
}
