//! Aggregation module for summarizing trip data
//!
//! Each reporting pass is an independent function over a slice of trips:
//!
//! - [`Aggregator::time_stats`]: most frequent start month, weekday and hour
//! - [`Aggregator::station_stats`]: most frequent start, end and start→end pair
//! - [`Aggregator::duration_stats`]: total and mean trip duration
//! - [`Aggregator::user_stats`]: user-type counts plus optional demographics
//! - [`RawRowPager`]: the raw rows in fixed-size windows
//!
//! Every pass returns `None` for an empty slice instead of failing, so an
//! over-narrow filter yields a "no data" report.
//!
//! # Ties
//!
//! When several values share the highest frequency, "most frequent" reports
//! one of them and which one is unspecified. The current implementation
//! picks the value encountered first, but callers must not rely on it.
//!
//! # Examples
//!
//! ```
//! use bikestat::aggregation::{Aggregator, RawRowPager};
//! use bikestat::filters::TripFilter;
//! use bikestat::types::{City, Dataset};
//!
//! let dataset = Dataset::new(City::Washington, Vec::new(), false);
//! let report = Aggregator::report(&dataset, &TripFilter::new());
//! assert!(report.time.stats.is_none());
//! assert_eq!(RawRowPager::new(dataset.trips()).count(), 0);
//! ```

use crate::filters::TripFilter;
use crate::types::{City, Dataset, Gender, TripRecord, UserType};
use chrono::Weekday;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::debug;

/// Rows shown per raw-data window
pub const RAW_PAGE_SIZE: usize = 5;

/// A value together with how many trips had it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Counted<T> {
    /// Transform the value, keeping the count
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Counted<U> {
        Counted {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Count occurrences, most frequent first
///
/// Equal counts keep first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<Counted<T>>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    // value -> (count, index of first occurrence)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (index, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, index)).0 += 1;
    }

    let mut counted: Vec<(T, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    counted
        .into_iter()
        .map(|(value, count, _)| Counted { value, count })
        .collect()
}

/// The most frequent value, or `None` for no values
pub fn most_frequent<T, I>(values: I) -> Option<Counted<T>>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next()
}

/// Most frequent travel times
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    /// 1-based start month
    pub popular_month: Counted<u32>,
    pub popular_weekday: Counted<Weekday>,
    /// Start hour (0-23)
    pub popular_hour: Counted<u32>,
}

/// A start → end station combination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

impl fmt::Display for StationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}

/// Most popular stations and trip
#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub popular_start: Counted<String>,
    pub popular_end: Counted<String>,
    pub popular_trip: Counted<StationPair>,
}

/// Total and average trip duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub trip_count: usize,
    /// Sum of all trip durations in seconds
    pub total_secs: f64,
    /// Arithmetic mean trip duration in seconds
    pub mean_secs: f64,
}

/// Birth-year extremes and mode
#[derive(Debug, Clone, PartialEq)]
pub struct BirthYearStats {
    pub most_common: Counted<i32>,
    pub most_recent: i32,
    pub earliest: i32,
}

/// Gender and birth-year statistics, for datasets that record them
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    pub genders: Vec<Counted<Gender>>,
    /// `None` when no trip in the set has a known birth year
    pub birth_years: Option<BirthYearStats>,
}

/// Rider statistics
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Trips per user type, most frequent first; unknown types are skipped
    pub user_types: Vec<Counted<UserType>>,
    /// `None` when the dataset has no gender/birth-year columns
    pub demographics: Option<Demographics>,
}

/// The result of one reporting pass and how long it took
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// `None` means there was no data to aggregate
    pub stats: Option<T>,
    pub elapsed: Duration,
}

/// All statistics for one filtered dataset
#[derive(Debug, Clone, PartialEq)]
pub struct TripReport {
    pub city: City,
    pub filter: TripFilter,
    pub trip_count: usize,
    pub time: Timed<TimeStats>,
    pub stations: Timed<StationStats>,
    pub durations: Timed<DurationStats>,
    pub users: Timed<UserStats>,
}

fn timed<T>(pass: &str, f: impl FnOnce() -> Option<T>) -> Timed<T> {
    let start = Instant::now();
    let stats = f();
    let elapsed = start.elapsed();
    debug!("{pass} pass took {:?}", elapsed);
    Timed { stats, elapsed }
}

/// Namespace for the reporting passes
pub struct Aggregator;

impl Aggregator {
    /// Run every statistics pass over `dataset`
    pub fn report(dataset: &Dataset, filter: &TripFilter) -> TripReport {
        let trips = dataset.trips();
        TripReport {
            city: dataset.city(),
            filter: *filter,
            trip_count: trips.len(),
            time: timed("time", || Self::time_stats(trips)),
            stations: timed("station", || Self::station_stats(trips)),
            durations: timed("duration", || Self::duration_stats(trips)),
            users: timed("user", || {
                Self::user_stats(trips, dataset.has_demographics())
            }),
        }
    }

    /// Most frequent start month, weekday and hour
    pub fn time_stats(trips: &[TripRecord]) -> Option<TimeStats> {
        Some(TimeStats {
            popular_month: most_frequent(trips.iter().map(|t| t.month()))?,
            popular_weekday: most_frequent(trips.iter().map(|t| t.weekday()))?,
            popular_hour: most_frequent(trips.iter().map(|t| t.hour()))?,
        })
    }

    /// Most frequent start station, end station and station pair
    pub fn station_stats(trips: &[TripRecord]) -> Option<StationStats> {
        let popular_start =
            most_frequent(trips.iter().map(|t| t.start_station()))?.map(str::to_string);
        let popular_end =
            most_frequent(trips.iter().map(|t| t.end_station()))?.map(str::to_string);
        let popular_trip = most_frequent(trips.iter().map(|t| (t.start_station(), t.end_station())))?
            .map(|(start, end)| StationPair {
                start: start.to_string(),
                end: end.to_string(),
            });

        Some(StationStats {
            popular_start,
            popular_end,
            popular_trip,
        })
    }

    /// Sum and mean of trip durations
    pub fn duration_stats(trips: &[TripRecord]) -> Option<DurationStats> {
        if trips.is_empty() {
            return None;
        }
        let total_secs: f64 = trips.iter().map(|t| t.duration_secs()).sum();
        Some(DurationStats {
            trip_count: trips.len(),
            total_secs,
            mean_secs: total_secs / trips.len() as f64,
        })
    }

    /// User-type counts, plus gender and birth-year statistics when
    /// `has_demographics` is set
    pub fn user_stats(trips: &[TripRecord], has_demographics: bool) -> Option<UserStats> {
        if trips.is_empty() {
            return None;
        }

        let user_types = value_counts(trips.iter().filter_map(|t| t.user_type()))
            .into_iter()
            .map(|c| c.map(UserType::clone))
            .collect();

        let demographics = has_demographics.then(|| Self::demographics(trips));

        Some(UserStats {
            user_types,
            demographics,
        })
    }

    fn demographics(trips: &[TripRecord]) -> Demographics {
        let genders = value_counts(trips.iter().filter_map(|t| t.gender()))
            .into_iter()
            .map(|c| c.map(Gender::clone))
            .collect();

        let years = || trips.iter().filter_map(|t| t.birth_year());
        let birth_years = match (most_frequent(years()), years().max(), years().min()) {
            (Some(most_common), Some(most_recent), Some(earliest)) => Some(BirthYearStats {
                most_common,
                most_recent,
                earliest,
            }),
            _ => None,
        };

        Demographics {
            genders,
            birth_years,
        }
    }
}

/// A window of consecutive raw rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowWindow<'a> {
    /// Index of the first row within the filtered set
    pub offset: usize,
    pub rows: &'a [TripRecord],
}

/// Walks trips in fixed-size windows, in original order
///
/// The last window may be shorter than the page size. The pager can be
/// rewound with [`RawRowPager::reset`].
#[derive(Debug, Clone)]
pub struct RawRowPager<'a> {
    rows: &'a [TripRecord],
    page_size: usize,
    offset: usize,
}

impl<'a> RawRowPager<'a> {
    /// Pager over `rows` with the default window of [`RAW_PAGE_SIZE`]
    pub fn new(rows: &'a [TripRecord]) -> Self {
        Self::with_page_size(rows, RAW_PAGE_SIZE)
    }

    /// Pager with a custom window size (at least 1)
    pub fn with_page_size(rows: &'a [TripRecord], page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            offset: 0,
        }
    }

    /// Rewind to the first window
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Rows not yet shown
    pub fn remaining(&self) -> usize {
        self.rows.len().saturating_sub(self.offset)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

impl<'a> Iterator for RawRowPager<'a> {
    type Item = RowWindow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.rows.len() {
            return None;
        }
        let end = (self.offset + self.page_size).min(self.rows.len());
        let window = RowWindow {
            offset: self.offset,
            rows: &self.rows[self.offset..end],
        };
        self.offset = end;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let windows = self.remaining().div_ceil(self.page_size);
        (windows, Some(windows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, month, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn trip(start: NaiveDateTime, from: &str, to: &str, secs: f64) -> TripRecord {
        TripRecord::new(start, start, from, to, secs)
    }

    /// Six trips: mostly March, mostly Mondays, mostly 8am
    fn sample_trips() -> Vec<TripRecord> {
        vec![
            // 2017-03-06 and 2017-03-13 were Mondays
            trip(ts(3, 6, 8), "Canal St", "Clark St", 300.0)
                .with_user_type(Some(UserType::Subscriber))
                .with_gender(Some(Gender::Male))
                .with_birth_year(Some(1985)),
            trip(ts(3, 13, 8), "Canal St", "Clark St", 600.0)
                .with_user_type(Some(UserType::Subscriber))
                .with_gender(Some(Gender::Female))
                .with_birth_year(Some(1990)),
            trip(ts(3, 14, 17), "Canal St", "State St", 900.0)
                .with_user_type(Some(UserType::Customer))
                .with_gender(Some(Gender::Male))
                .with_birth_year(Some(1990)),
            trip(ts(1, 2, 8), "Lake St", "Clark St", 120.0)
                .with_user_type(Some(UserType::Subscriber))
                .with_gender(Some(Gender::Male))
                .with_birth_year(Some(2001)),
            trip(ts(1, 3, 12), "Lake St", "State St", 60.0)
                .with_user_type(None)
                .with_birth_year(Some(1961)),
            trip(ts(3, 20, 23), "Canal St", "Clark St", 20.0)
                .with_user_type(Some(UserType::Other("Dependent".to_string()))),
        ]
    }

    #[test]
    fn test_value_counts_ordering() {
        let counts = value_counts(["b", "a", "b", "c", "a", "b"]);
        assert_eq!(
            counts,
            vec![
                Counted { value: "b", count: 3 },
                Counted { value: "a", count: 2 },
                Counted { value: "c", count: 1 },
            ]
        );
    }

    #[test]
    fn test_most_frequent_tie_reports_a_tied_value() {
        let top = most_frequent([4, 7, 7, 4]).unwrap();
        assert_eq!(top.count, 2);
        assert!(top.value == 4 || top.value == 7);
    }

    #[test]
    fn test_most_frequent_empty() {
        assert!(most_frequent(Vec::<u32>::new()).is_none());
        assert!(value_counts(Vec::<u32>::new()).is_empty());
    }

    #[test]
    fn test_time_stats() {
        let stats = Aggregator::time_stats(&sample_trips()).unwrap();
        assert_eq!(stats.popular_month, Counted { value: 3, count: 4 });
        assert_eq!(
            stats.popular_weekday,
            Counted {
                value: Weekday::Mon,
                count: 4
            }
        );
        assert_eq!(stats.popular_hour, Counted { value: 8, count: 3 });
    }

    #[test]
    fn test_station_stats() {
        let stats = Aggregator::station_stats(&sample_trips()).unwrap();
        assert_eq!(stats.popular_start.value, "Canal St");
        assert_eq!(stats.popular_start.count, 4);
        assert_eq!(stats.popular_end.value, "Clark St");
        assert_eq!(stats.popular_end.count, 4);
        assert_eq!(
            stats.popular_trip,
            Counted {
                value: StationPair {
                    start: "Canal St".to_string(),
                    end: "Clark St".to_string()
                },
                count: 3
            }
        );
        assert_eq!(stats.popular_trip.value.to_string(), "Canal St -> Clark St");
    }

    #[test]
    fn test_duration_stats() {
        let stats = Aggregator::duration_stats(&sample_trips()).unwrap();
        assert_eq!(stats.trip_count, 6);
        assert_eq!(stats.total_secs, 2000.0);
        assert!((stats.mean_secs - 2000.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_user_stats_with_demographics() {
        let stats = Aggregator::user_stats(&sample_trips(), true).unwrap();
        assert_eq!(
            stats.user_types,
            vec![
                Counted {
                    value: UserType::Subscriber,
                    count: 3
                },
                Counted {
                    value: UserType::Customer,
                    count: 1
                },
                Counted {
                    value: UserType::Other("Dependent".to_string()),
                    count: 1
                },
            ]
        );

        let demographics = stats.demographics.unwrap();
        assert_eq!(
            demographics.genders,
            vec![
                Counted {
                    value: Gender::Male,
                    count: 3
                },
                Counted {
                    value: Gender::Female,
                    count: 1
                },
            ]
        );
        let years = demographics.birth_years.unwrap();
        assert_eq!(
            years.most_common,
            Counted {
                value: 1990,
                count: 2
            }
        );
        assert_eq!(years.most_recent, 2001);
        assert_eq!(years.earliest, 1961);
    }

    #[test]
    fn test_user_stats_without_demographics() {
        let stats = Aggregator::user_stats(&sample_trips(), false).unwrap();
        assert_eq!(stats.user_types.len(), 3);
        assert!(stats.demographics.is_none());
    }

    #[test]
    fn test_birth_years_all_unknown() {
        let trips = vec![trip(ts(2, 1, 9), "A", "B", 10.0).with_gender(Some(Gender::Female))];
        let demographics = Aggregator::user_stats(&trips, true)
            .unwrap()
            .demographics
            .unwrap();
        assert_eq!(demographics.genders.len(), 1);
        assert!(demographics.birth_years.is_none());
    }

    #[test]
    fn test_empty_set_reports_no_data() {
        assert!(Aggregator::time_stats(&[]).is_none());
        assert!(Aggregator::station_stats(&[]).is_none());
        assert!(Aggregator::duration_stats(&[]).is_none());
        assert!(Aggregator::user_stats(&[], true).is_none());

        let dataset = Dataset::new(City::Chicago, Vec::new(), true);
        let report = Aggregator::report(&dataset, &TripFilter::new());
        assert_eq!(report.trip_count, 0);
        assert!(report.time.stats.is_none());
        assert!(report.stations.stats.is_none());
        assert!(report.durations.stats.is_none());
        assert!(report.users.stats.is_none());
    }

    #[test]
    fn test_report_runs_every_pass() {
        let dataset = Dataset::new(City::Chicago, sample_trips(), true);
        let filter = TripFilter::new();
        let report = Aggregator::report(&dataset, &filter);

        assert_eq!(report.city, City::Chicago);
        assert_eq!(report.trip_count, 6);
        assert!(report.time.stats.is_some());
        assert!(report.stations.stats.is_some());
        assert!(report.durations.stats.is_some());
        assert!(report.users.stats.unwrap().demographics.is_some());
    }

    #[test]
    fn test_pager_windows() {
        let trips: Vec<TripRecord> = (0..12)
            .map(|i| trip(ts(1, 1 + i, 0), &format!("S{i}"), "E", i as f64))
            .collect();
        let mut pager = RawRowPager::new(&trips);
        assert_eq!(pager.size_hint(), (3, Some(3)));

        let first = pager.next().unwrap();
        assert_eq!(first.offset, 0);
        assert_eq!(first.rows, &trips[0..5]);

        let second = pager.next().unwrap();
        assert_eq!(second.offset, 5);
        assert_eq!(second.rows, &trips[5..10]);

        let third = pager.next().unwrap();
        assert_eq!(third.offset, 10);
        assert_eq!(third.rows.len(), 2);
        assert!(pager.is_exhausted());
        assert!(pager.next().is_none());

        pager.reset();
        assert_eq!(pager.remaining(), 12);
        assert_eq!(pager.next().unwrap().offset, 0);
    }

    #[test]
    fn test_pager_zero_page_size_is_clamped() {
        let trips = sample_trips();
        let pager = RawRowPager::with_page_size(&trips, 0);
        assert_eq!(pager.count(), trips.len());
    }
}
