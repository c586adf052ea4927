//! Core domain types for bikestat
//!
//! This module contains the fundamental types used throughout the bikestat
//! library: the three supported cities, the month and weekday filter choices,
//! and the trip record with its calendar fields derived from the start time.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::error::{BikestatError, Result};
use crate::filters::TripFilter;

/// A city with a bikeshare dataset
///
/// # Examples
/// ```
/// use bikestat_core::types::City;
///
/// let city: City = "New York City".parse().unwrap();
/// assert_eq!(city, City::NewYorkCity);
/// assert_eq!(city.key(), "new york city");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every supported city, in prompt order
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase key accepted on input
    pub fn key(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Human-readable name for report headers
    pub fn display_name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for City {
    type Err = BikestatError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|city| city.key() == wanted)
            .ok_or_else(|| BikestatError::UnknownCity(s.trim().to_string()))
    }
}

/// A month that can be used as a filter
///
/// The datasets only cover the first half of the year, so only January
/// through June are selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TripMonth {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
}

impl TripMonth {
    /// Every selectable month in calendar order
    pub const ALL: [TripMonth; 6] = [
        TripMonth::January,
        TripMonth::February,
        TripMonth::March,
        TripMonth::April,
        TripMonth::May,
        TripMonth::June,
    ];

    /// 1-based calendar index (January = 1)
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Capitalized month name
    pub fn name(self) -> &'static str {
        month_name(self.number()).unwrap_or("Unknown")
    }

    /// Look up a selectable month by calendar index
    pub fn from_number(number: u32) -> Option<Self> {
        TripMonth::ALL.into_iter().find(|m| m.number() == number)
    }
}

impl fmt::Display for TripMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TripMonth {
    type Err = BikestatError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        TripMonth::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BikestatError::InvalidChoice {
                kind: "month",
                value: wanted.to_string(),
                expected: MonthChoice::OPTIONS.join(", "),
            })
    }
}

/// Capitalized name for a 1-based calendar month
///
/// ```
/// use bikestat_core::types::month_name;
///
/// assert_eq!(month_name(3), Some("March"));
/// assert_eq!(month_name(13), None);
/// ```
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Weekdays in prompt order (the datasets' week starts on Sunday)
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Capitalized full weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Case-insensitive lookup of a full weekday name
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let wanted = s.trim();
    WEEKDAYS
        .into_iter()
        .find(|day| weekday_name(*day).eq_ignore_ascii_case(wanted))
}

/// Month filter value: a specific month or "all"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthChoice {
    #[default]
    All,
    Month(TripMonth),
}

impl MonthChoice {
    /// Accepted input values
    pub const OPTIONS: [&'static str; 7] = [
        "january", "february", "march", "april", "may", "june", "all",
    ];

    /// The selected month, if any
    pub fn month(&self) -> Option<TripMonth> {
        match self {
            MonthChoice::All => None,
            MonthChoice::Month(m) => Some(*m),
        }
    }
}

impl fmt::Display for MonthChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthChoice::All => write!(f, "all"),
            MonthChoice::Month(m) => write!(f, "{}", m.name().to_lowercase()),
        }
    }
}

impl FromStr for MonthChoice {
    type Err = BikestatError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(MonthChoice::All);
        }
        s.parse().map(MonthChoice::Month)
    }
}

/// Day-of-week filter value: a specific weekday or "all"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayChoice {
    #[default]
    All,
    Day(Weekday),
}

impl DayChoice {
    /// Accepted input values
    pub const OPTIONS: [&'static str; 8] = [
        "sunday",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "all",
    ];

    /// The selected weekday, if any
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            DayChoice::All => None,
            DayChoice::Day(d) => Some(*d),
        }
    }
}

impl fmt::Display for DayChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayChoice::All => write!(f, "all"),
            DayChoice::Day(d) => write!(f, "{}", weekday_name(*d).to_lowercase()),
        }
    }
}

impl FromStr for DayChoice {
    type Err = BikestatError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DayChoice::All);
        }
        parse_weekday(s)
            .map(DayChoice::Day)
            .ok_or_else(|| BikestatError::InvalidChoice {
                kind: "day",
                value: s.trim().to_string(),
                expected: DayChoice::OPTIONS.join(", "),
            })
    }
}

/// Rider category as recorded by the operator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserType {
    Subscriber,
    Customer,
    /// Any other label (e.g. "Dependent"), kept verbatim
    Other(String),
}

impl UserType {
    /// Parse a CSV label; blank means unknown
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" => None,
            "Subscriber" => Some(UserType::Subscriber),
            "Customer" => Some(UserType::Customer),
            other => Some(UserType::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserType::Subscriber => "Subscriber",
            UserType::Customer => "Customer",
            UserType::Other(label) => label,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rider gender as recorded by the operator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    /// Parse a CSV label; blank means unknown
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" => None,
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            other => Some(Gender::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(label) => label,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar fields derived from a trip's start time
///
/// # Examples
/// ```
/// use bikestat_core::types::CalendarFields;
/// use chrono::{NaiveDate, Weekday};
///
/// let start = NaiveDate::from_ymd_opt(2017, 3, 14)
///     .unwrap()
///     .and_hms_opt(17, 45, 0)
///     .unwrap();
/// let fields = CalendarFields::from_timestamp(&start);
/// assert_eq!(fields.month, 3);
/// assert_eq!(fields.weekday, Weekday::Tue);
/// assert_eq!(fields.hour, 17);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFields {
    /// 1-based month (1-12)
    pub month: u32,
    /// Day of week
    pub weekday: Weekday,
    /// Hour of day (0-23)
    pub hour: u32,
}

impl CalendarFields {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            month: ts.month(),
            weekday: ts.weekday(),
            hour: ts.hour(),
        }
    }
}

/// One bikeshare trip
///
/// Fields are read-only. The calendar fields are computed once in
/// [`TripRecord::new`] and cannot drift from the start time afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    start_station: String,
    end_station: String,
    duration_secs: f64,
    user_type: Option<UserType>,
    gender: Option<Gender>,
    birth_year: Option<i32>,
    calendar: CalendarFields,
}

impl TripRecord {
    /// Create a trip; `duration_secs` is the recorded trip duration in seconds
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            duration_secs,
            user_type: None,
            gender: None,
            birth_year: None,
            calendar: CalendarFields::from_timestamp(&start_time),
        }
    }

    /// Set the rider category
    pub fn with_user_type(mut self, user_type: Option<UserType>) -> Self {
        self.user_type = user_type;
        self
    }

    /// Set the rider gender
    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    /// Set the rider birth year
    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> &NaiveDateTime {
        &self.start_time
    }

    pub fn end_time(&self) -> &NaiveDateTime {
        &self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn user_type(&self) -> Option<&UserType> {
        self.user_type.as_ref()
    }

    pub fn gender(&self) -> Option<&Gender> {
        self.gender.as_ref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    /// All derived calendar fields
    pub fn calendar(&self) -> CalendarFields {
        self.calendar
    }

    /// Derived 1-based start month
    pub fn month(&self) -> u32 {
        self.calendar.month
    }

    /// Derived start weekday
    pub fn weekday(&self) -> Weekday {
        self.calendar.weekday
    }

    /// Derived start hour
    pub fn hour(&self) -> u32 {
        self.calendar.hour
    }
}

/// The trips loaded for one city
///
/// A dataset is never modified after loading; filtering produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    city: City,
    trips: Vec<TripRecord>,
    has_demographics: bool,
}

impl Dataset {
    /// Wrap loaded trips; `has_demographics` is whether the source carried
    /// gender and birth-year columns
    pub fn new(city: City, trips: Vec<TripRecord>, has_demographics: bool) -> Self {
        Self {
            city,
            trips,
            has_demographics,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    /// Trips in source order
    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn has_demographics(&self) -> bool {
        self.has_demographics
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Copy of this dataset keeping only trips that pass `filter`, in order
    pub fn filtered(&self, filter: &TripFilter) -> Dataset {
        Dataset {
            city: self.city,
            trips: filter.apply(&self.trips),
            has_demographics: self.has_demographics,
        }
    }
}
