//! Common test utilities and helpers for bikestat tests
//!
//! This module provides reusable test utilities, trip builders, an
//! in-memory dataset source and helpers for the CSV fixtures under
//! `tests/fixtures/`.

use bikestat::{
    config::DatasetCatalog,
    data_loader::CsvDatasetSource,
    error::{BikestatError, Result},
    provider::DatasetSource,
    types::{City, Dataset, Gender, TripRecord, UserType},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Trips in tests/fixtures/chicago.csv
#[allow(dead_code)]
pub const CHICAGO_TRIPS: usize = 10;
/// March trips in tests/fixtures/chicago.csv
#[allow(dead_code)]
pub const CHICAGO_MARCH_TRIPS: usize = 6;
/// Trips in tests/fixtures/washington.csv
#[allow(dead_code)]
pub const WASHINGTON_TRIPS: usize = 12;

/// Builder for creating test TripRecord instances
pub struct TripRecordBuilder {
    start: NaiveDateTime,
    duration_secs: f64,
    start_station: String,
    end_station: String,
    user_type: Option<UserType>,
    gender: Option<Gender>,
    birth_year: Option<i32>,
}

#[allow(dead_code)]
impl TripRecordBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            start: timestamp(2017, 1, 1, 0, 7),
            duration_secs: 300.0,
            start_station: "Canal St & Adams St".to_string(),
            end_station: "Clinton St & Madison St".to_string(),
            user_type: Some(UserType::Subscriber),
            gender: None,
            birth_year: None,
        }
    }

    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    pub fn with_date(mut self, year: i32, month: u32, day: u32, hour: u32) -> Self {
        self.start = timestamp(year, month, day, hour, 0);
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = start.to_string();
        self.end_station = end.to_string();
        self
    }

    pub fn with_user_type(mut self, user_type: Option<UserType>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn build(self) -> TripRecord {
        let end = self.start + chrono::Duration::milliseconds((self.duration_secs * 1000.0) as i64);
        TripRecord::new(
            self.start,
            end,
            self.start_station,
            self.end_station,
            self.duration_secs,
        )
        .with_user_type(self.user_type)
        .with_gender(self.gender)
        .with_birth_year(self.birth_year)
    }
}

impl Default for TripRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Directory holding the fixture CSVs
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// CSV source reading the fixture CSVs
#[allow(dead_code)]
pub fn fixture_source() -> CsvDatasetSource {
    CsvDatasetSource::new(DatasetCatalog::new(fixtures_dir()))
}

/// Dataset source serving prebuilt datasets
#[allow(dead_code)]
#[derive(Default)]
pub struct MemorySource {
    datasets: HashMap<City, Dataset>,
}

#[allow(dead_code)]
impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.insert(dataset.city(), dataset);
        self
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, city: City) -> Result<Dataset> {
        self.datasets
            .get(&city)
            .cloned()
            .ok_or_else(|| BikestatError::DatasetNotFound {
                city,
                path: PathBuf::from(format!("memory://{}", city.key())),
            })
    }
}
