//! Data loader module for reading city trip CSV files
//!
//! Each city's trips live in one CSV file (see [`crate::config`]). The loader
//! reads the whole file, derives the calendar fields of every trip, and
//! fails the entire load on the first malformed row rather than skipping it,
//! so aggregates are never computed over a silently truncated table.
//!
//! Expected columns: `Start Time`, `End Time`, `Trip Duration`,
//! `Start Station`, `End Station`, `User Type`, and optionally `Gender` and
//! `Birth Year`. Any other column is ignored.
//!
//! # Examples
//!
//! ```no_run
//! use bikestat::config::DatasetCatalog;
//! use bikestat::data_loader::CsvDatasetSource;
//! use bikestat::provider::DatasetSource;
//! use bikestat::types::City;
//!
//! # fn example() -> bikestat::Result<()> {
//! let source = CsvDatasetSource::new(DatasetCatalog::new("data"));
//! let dataset = source.load(City::Chicago)?;
//! println!("{} trips, demographics: {}", dataset.len(), dataset.has_demographics());
//! # Ok(())
//! # }
//! ```

use crate::config::DatasetCatalog;
use crate::error::{BikestatError, Result};
use crate::provider::DatasetSource;
use crate::types::{City, Dataset, Gender, TripRecord, UserType};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

/// Columns every dataset must have
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

/// Columns that enable the gender and birth-year statistics
pub const DEMOGRAPHIC_COLUMNS: [&str; 2] = ["Gender", "Birth Year"];

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One CSV row before validation
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // Written as a float ("1992.0") in the published datasets
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    fn into_trip(self, file: &Path, line: u64) -> Result<TripRecord> {
        let start_time = parse_field_timestamp(&self.start_time, file, line)?;
        let end_time = parse_field_timestamp(&self.end_time, file, line)?;

        if !self.trip_duration.is_finite() || self.trip_duration < 0.0 {
            return Err(BikestatError::InvalidRecord {
                file: file.to_path_buf(),
                line,
                error: format!(
                    "trip duration must be a non-negative number of seconds, got {}",
                    self.trip_duration
                ),
            });
        }

        let birth_year = match self.birth_year {
            None => None,
            Some(year) if year.is_finite() && year.fract() == 0.0 && year.abs() < 10_000.0 => {
                Some(year as i32)
            }
            Some(year) => {
                return Err(BikestatError::InvalidRecord {
                    file: file.to_path_buf(),
                    line,
                    error: format!("birth year must be a whole year, got {year}"),
                });
            }
        };

        Ok(TripRecord::new(
            start_time,
            end_time,
            self.start_station,
            self.end_station,
            self.trip_duration,
        )
        .with_user_type(self.user_type.as_deref().and_then(UserType::from_label))
        .with_gender(self.gender.as_deref().and_then(Gender::from_label))
        .with_birth_year(birth_year))
    }
}

/// Parse a dataset timestamp (`2017-01-01 00:07:57`, ISO `T` and fractional
/// seconds also accepted)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn parse_field_timestamp(value: &str, file: &Path, line: u64) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| BikestatError::InvalidTimestamp {
        file: file.to_path_buf(),
        line,
        value: value.to_string(),
    })
}

/// A row the CSV reader itself rejected (ragged row, invalid UTF-8)
fn malformed(file: &Path, err: &csv::Error) -> BikestatError {
    let error = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("found {len} fields, expected {expected_len}"),
        csv::ErrorKind::Utf8 { err, .. } => err.to_string(),
        _ => err.to_string(),
    };
    BikestatError::InvalidRecord {
        file: file.to_path_buf(),
        line: err.position().map(|p| p.line()).unwrap_or_default(),
        error,
    }
}

/// Read a trip CSV from any reader
///
/// `origin` is only used in error messages and logs.
pub fn read_trips<R: Read>(reader: R, city: City, origin: &Path) -> Result<Dataset> {
    read_trips_with_progress(reader, city, origin, None)
}

fn read_trips_with_progress<R: Read>(
    reader: R,
    city: City,
    origin: &Path,
    progress: Option<&ProgressBar>,
) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| malformed(origin, &e))?
        .clone();

    let has_column = |name: &str| headers.iter().any(|h| h == name);
    if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|c| !has_column(*c)) {
        return Err(BikestatError::InvalidRecord {
            file: origin.to_path_buf(),
            line: 1,
            error: format!("missing column '{missing}'"),
        });
    }
    let has_demographics = DEMOGRAPHIC_COLUMNS.into_iter().all(|c| has_column(c));
    if !has_demographics {
        debug!("{} has no gender/birth year columns", origin.display());
    }

    let mut trips = Vec::new();
    let mut record = StringRecord::new();
    while rdr
        .read_record(&mut record)
        .map_err(|e| malformed(origin, &e))?
    {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawTrip =
            record
                .deserialize(Some(&headers))
                .map_err(|e| BikestatError::InvalidRecord {
                    file: origin.to_path_buf(),
                    line,
                    error: e.to_string(),
                })?;
        trips.push(raw.into_trip(origin, line)?);

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(Dataset::new(city, trips, has_demographics))
}

/// Dataset source backed by the CSV files of a [`DatasetCatalog`]
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    catalog: DatasetCatalog,
    show_progress: bool,
}

impl CsvDatasetSource {
    pub fn new(catalog: DatasetCatalog) -> Self {
        Self {
            catalog,
            show_progress: false,
        }
    }

    /// Show a spinner with the running row count while loading
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    fn progress_bar(&self, city: City) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} trips loaded")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Loading {}", city.display_name()));
        Some(pb)
    }
}

impl DatasetSource for CsvDatasetSource {
    fn load(&self, city: City) -> Result<Dataset> {
        let path = self.catalog.path_for(city);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BikestatError::DatasetNotFound { city, path });
            }
            Err(e) => return Err(e.into()),
        };

        let pb = self.progress_bar(city);
        let result = read_trips_with_progress(file, city, &path, pb.as_ref());
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let dataset = result?;

        info!(
            "Loaded {} trips for {} from {}",
            dataset.len(),
            city.display_name(),
            path.display()
        );
        Ok(dataset)
    }
}
