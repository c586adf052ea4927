//! Dataset source trait
//!
//! This module defines the `DatasetSource` trait that every trip loader
//! implements. It provides a uniform interface for loading one city's trips
//! and for the load-then-filter step the reporting passes consume.

use crate::error::Result;
use crate::filters::TripFilter;
use crate::types::{City, Dataset};
use tracing::info;

/// Trait for city dataset loaders.
///
/// The CSV loader in the `bikestat` crate implements this; tests use
/// in-memory sources.
pub trait DatasetSource {
    /// Load every trip for `city`, with derived calendar fields.
    fn load(&self, city: City) -> Result<Dataset>;

    /// Load `city` and narrow it with `filter`.
    fn load_filtered(&self, city: City, filter: &TripFilter) -> Result<Dataset> {
        let dataset = self.load(city)?;
        let filtered = dataset.filtered(filter);
        info!(
            "{}: {} of {} trips match {}",
            city.display_name(),
            filtered.len(),
            dataset.len(),
            filter
        );
        Ok(filtered)
    }
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn load(&self, city: City) -> Result<Dataset> {
        (**self).load(city)
    }
}
