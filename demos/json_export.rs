//! Example of exporting bikestat data to JSON
//!
//! This example writes one JSON report per city to the current directory.

use bikestat::{
    Result,
    aggregation::Aggregator,
    config::DatasetCatalog,
    data_loader::CsvDatasetSource,
    filters::TripFilter,
    output::get_formatter,
    provider::DatasetSource,
};
use std::fs;

fn main() -> Result<()> {
    let catalog = DatasetCatalog::resolve(None);
    let cities = catalog.available_cities();
    if cities.is_empty() {
        println!("No datasets found in {}", catalog.data_dir().display());
        return Ok(());
    }

    let source = CsvDatasetSource::new(catalog);
    let formatter = get_formatter(true);
    let filter = TripFilter::new();

    for city in cities {
        let dataset = source.load_filtered(city, &filter)?;
        let report = Aggregator::report(&dataset, &filter);

        let file_name = format!("{}_report.json", city.key().replace(' ', "_"));
        fs::write(&file_name, formatter.format_report(&report))?;
        println!("Exported {} trips for {} to {}", dataset.len(), city.display_name(), file_name);
    }

    Ok(())
}
