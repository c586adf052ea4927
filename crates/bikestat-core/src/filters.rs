//! Filtering module for trip records
//!
//! A [`TripFilter`] narrows trips by derived start month and derived start
//! weekday. Either predicate may be absent ("all"); present predicates are
//! combined with logical AND, so the order in which they are added never
//! matters and applying a filter twice is the same as applying it once.
//!
//! # Examples
//!
//! ```
//! use bikestat_core::filters::TripFilter;
//! use bikestat_core::types::TripMonth;
//! use chrono::Weekday;
//!
//! // Mondays in March
//! let filter = TripFilter::new()
//!     .with_month(TripMonth::March)
//!     .with_weekday(Weekday::Mon);
//! assert_eq!(filter.to_string(), "month=March, day=Monday");
//! ```

use crate::types::{DayChoice, MonthChoice, TripMonth, TripRecord, weekday_name};
use chrono::Weekday;
use std::fmt;
use tracing::debug;

/// Filter configuration for trip records
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TripFilter {
    /// Required derived month
    pub month: Option<TripMonth>,
    /// Required derived weekday
    pub weekday: Option<Weekday>,
}

impl TripFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from validated prompt choices; "all" adds no predicate
    pub fn from_choices(month: MonthChoice, day: DayChoice) -> Self {
        let mut filter = Self::new();
        if let Some(m) = month.month() {
            filter = filter.with_month(m);
        }
        if let Some(d) = day.weekday() {
            filter = filter.with_weekday(d);
        }
        filter
    }

    /// Keep only trips starting in `month`
    pub fn with_month(mut self, month: TripMonth) -> Self {
        self.month = Some(month);
        self
    }

    /// Keep only trips starting on `weekday`
    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    /// Month name, or "all" when unrestricted
    pub fn month_label(&self) -> &'static str {
        self.month.map(|m| m.name()).unwrap_or("all")
    }

    /// Weekday name, or "all" when unrestricted
    pub fn day_label(&self) -> &'static str {
        self.weekday.map(weekday_name).unwrap_or("all")
    }

    /// Whether no predicate is set
    pub fn is_unrestricted(&self) -> bool {
        self.month.is_none() && self.weekday.is_none()
    }

    /// Check if a trip passes the filter
    pub fn matches(&self, trip: &TripRecord) -> bool {
        if let Some(month) = self.month {
            if trip.month() != month.number() {
                return false;
            }
        }

        if let Some(weekday) = self.weekday {
            if trip.weekday() != weekday {
                return false;
            }
        }

        true
    }

    /// Clone the matching trips, preserving their order
    pub fn apply(&self, trips: &[TripRecord]) -> Vec<TripRecord> {
        let kept: Vec<TripRecord> = trips.iter().filter(|t| self.matches(t)).cloned().collect();
        debug!(
            "Filter [{}] kept {} of {} trips",
            self,
            kept.len(),
            trips.len()
        );
        kept
    }
}

impl fmt::Display for TripFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month={}, day={}", self.month_label(), self.day_label())
    }
}
