//! Core types, traits, and utilities for bikestat
//!
//! This crate provides the trip record model, the month/weekday filter,
//! the dataset-source trait and the error type shared by the `bikestat`
//! binary and its loaders.

pub mod error;
pub mod filters;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use error::{BikestatError, Result};
pub use filters::TripFilter;
pub use provider::DatasetSource;
pub use types::{
    CalendarFields, City, Dataset, DayChoice, Gender, MonthChoice, TripMonth, TripRecord, UserType,
};
