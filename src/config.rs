//! Dataset catalog configuration
//!
//! The city → file mapping is fixed at compile time. Only the directory the
//! files live in is configurable, and it is resolved once at process start:
//!
//! 1. an explicit `--data-dir`
//! 2. the `BIKESTAT_DATA_PATH` environment variable
//! 3. the current directory, if it holds any city file
//! 4. `<platform data dir>/bikestat`, if it exists
//! 5. the current directory
//!
//! # Examples
//!
//! ```
//! use bikestat::config::DatasetCatalog;
//! use bikestat::types::City;
//! use std::path::Path;
//!
//! let catalog = DatasetCatalog::new("/srv/bikeshare");
//! assert_eq!(
//!     catalog.path_for(City::NewYorkCity),
//!     Path::new("/srv/bikeshare/new_york_city.csv")
//! );
//! ```

use crate::types::City;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the data directory
pub const DATA_PATH_ENV: &str = "BIKESTAT_DATA_PATH";

/// File name of a city's dataset
pub const fn file_name(city: City) -> &'static str {
    match city {
        City::Chicago => "chicago.csv",
        City::NewYorkCity => "new_york_city.csv",
        City::Washington => "washington.csv",
    }
}

/// Dataset file for each city
pub const CITY_FILES: [(City, &str); 3] = [
    (City::Chicago, file_name(City::Chicago)),
    (City::NewYorkCity, file_name(City::NewYorkCity)),
    (City::Washington, file_name(City::Washington)),
];

/// Immutable mapping from city to dataset path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCatalog {
    data_dir: PathBuf,
}

impl DatasetCatalog {
    /// Catalog rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory using the lookup order above
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(dir) = explicit {
            debug!("Using data directory from command line: {}", dir.display());
            return Self::new(dir);
        }

        #[allow(clippy::collapsible_if)]
        if let Ok(dir) = env::var(DATA_PATH_ENV) {
            if !dir.trim().is_empty() {
                debug!("Using data directory from {DATA_PATH_ENV}: {dir}");
                return Self::new(dir);
            }
        }

        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let local = Self::new(&cwd);
        if local.has_any_dataset() {
            debug!("Using data directory {}", cwd.display());
            return local;
        }

        if let Some(data_dir) = dirs::data_dir() {
            let candidate = data_dir.join("bikestat");
            if candidate.is_dir() {
                debug!("Using data directory {}", candidate.display());
                return Self::new(candidate);
            }
        }

        debug!(
            "No dataset files found, defaulting to {}",
            cwd.display()
        );
        local
    }

    /// Directory the city files are read from
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a city's dataset
    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(file_name(city))
    }

    /// Cities whose dataset file exists
    pub fn available_cities(&self) -> Vec<City> {
        City::ALL
            .into_iter()
            .filter(|city| self.path_for(*city).is_file())
            .collect()
    }

    pub fn has_any_dataset(&self) -> bool {
        !self.available_cities().is_empty()
    }
}
