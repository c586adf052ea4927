//! Error types for bikestat
//!
//! This module defines the error types used throughout the bikestat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use bikestat_core::error::{BikestatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to BikestatError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::City;

/// Main error type for bikestat operations
///
/// Covers everything from a missing dataset file to a malformed row.
/// Loader errors carry the file and 1-based line so the user can find
/// the offending record.
#[derive(Error, Debug)]
pub enum BikestatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (its message already names itself)
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// City key with no known dataset
    #[error("Unknown city '{0}', expected one of: chicago, new york city, washington")]
    UnknownCity(String),

    /// A filter value outside its fixed domain
    #[error("Invalid {kind} '{value}', expected one of: {expected}")]
    InvalidChoice {
        /// Filter kind ("month", "day")
        kind: &'static str,
        /// The rejected input
        value: String,
        /// Comma-separated list of accepted values
        expected: String,
    },

    /// The dataset file for a city does not exist
    #[error("No dataset for {city} at {}", path.display())]
    DatasetNotFound {
        /// City whose file is missing
        city: City,
        /// Path that was tried
        path: PathBuf,
    },

    /// A start or end time that could not be parsed
    #[error("Invalid timestamp '{value}' in {} line {line}", file.display())]
    InvalidTimestamp {
        /// The file that caused the error
        file: PathBuf,
        /// 1-based line number
        line: u64,
        /// The raw timestamp text
        value: String,
    },

    /// A row that is structurally readable but semantically invalid
    #[error("Invalid record in {} line {line}: {error}", file.display())]
    InvalidRecord {
        /// The file that caused the error
        file: PathBuf,
        /// 1-based line number
        line: u64,
        /// The error message
        error: String,
    },

    /// Console input ended while a prompt was waiting for an answer
    #[error("Input closed before a valid answer was given")]
    InputClosed,
}

/// Convenience type alias for Results in bikestat
///
/// # Example
///
/// ```
/// use bikestat_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, BikestatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BikestatError::UnknownCity("boston".to_string());
        assert_eq!(
            error.to_string(),
            "Unknown city 'boston', expected one of: chicago, new york city, washington"
        );

        let error = BikestatError::InvalidTimestamp {
            file: PathBuf::from("chicago.csv"),
            line: 7,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid timestamp 'yesterday' in chicago.csv line 7"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let bikestat_error: BikestatError = io_error.into();
        assert!(matches!(bikestat_error, BikestatError::Io(_)));
    }

    #[test]
    fn test_dataset_not_found_names_city() {
        let error = BikestatError::DatasetNotFound {
            city: City::NewYorkCity,
            path: PathBuf::from("/data/new_york_city.csv"),
        };
        assert_eq!(
            error.to_string(),
            "No dataset for new york city at /data/new_york_city.csv"
        );
    }
}
