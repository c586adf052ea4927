//! Output formatting module for bikestat
//!
//! This module provides formatters for displaying trip statistics in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use bikestat::aggregation::Aggregator;
//! use bikestat::filters::TripFilter;
//! use bikestat::output::get_formatter;
//! use bikestat::types::{City, Dataset};
//!
//! let dataset = Dataset::new(City::Chicago, Vec::new(), true);
//! let report = Aggregator::report(&dataset, &TripFilter::new());
//!
//! // Table formatter for human-readable output
//! let formatter = get_formatter(false);
//! assert!(formatter.format_report(&report).contains("No data"));
//!
//! // JSON formatter for machine-readable output
//! let json_formatter = get_formatter(true);
//! assert!(json_formatter.format_report(&report).contains("\"trip_count\": 0"));
//! ```

use crate::aggregation::{
    Counted, DurationStats, RowWindow, StationStats, TimeStats, Timed, TripReport, UserStats,
};
use crate::types::{TripRecord, month_name, weekday_name};
use colored::Colorize;
use prettytable::{Row, Table, format, row};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

const RULE_WIDTH: usize = 40;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for output formatters
///
/// Implementations render a full statistics report and windows of raw rows.
pub trait OutputFormatter {
    /// Format every statistics pass of a report
    fn format_report(&self, report: &TripReport) -> String;

    /// Format one window of raw rows; `show_demographics` adds the gender
    /// and birth-year columns
    fn format_rows(&self, window: &RowWindow<'_>, show_demographics: bool) -> String;
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

/// Render seconds as `1d 2h 3m 4s`, dropping leading zero units
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        total % 86_400 / 3_600,
        total % 3_600 / 60,
        total % 60,
    );

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Table formatter for human-readable output
///
/// Each statistics pass is printed as its own section followed by how long
/// the pass took.
pub struct TableFormatter;

impl TableFormatter {
    fn count(n: usize) -> String {
        format_number(n as u64)
    }

    fn seconds(secs: f64) -> String {
        format!("{secs:.2}s ({})", format_duration(secs))
    }

    fn stats_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Statistic", b -> "Value", b -> "Trips"]);
        table
    }

    fn counted_row<T: ToString>(label: &str, counted: &Counted<T>) -> Row {
        row![label, counted.value.to_string(), r -> Self::count(counted.count)]
    }

    fn no_data() -> String {
        format!("{}\n", "No data for the selected filters.".yellow())
    }

    fn section<T>(title: &str, timed: &Timed<T>, body: impl FnOnce(&T) -> String) -> String {
        let mut output = format!("\n{}\n\n", title.bold());
        match &timed.stats {
            Some(stats) => output.push_str(&body(stats)),
            None => output.push_str(&Self::no_data()),
        }
        output.push_str(&Self::timing(timed.elapsed));
        output
    }

    fn timing(elapsed: Duration) -> String {
        format!(
            "\nThis took {:.6} seconds.\n{}\n",
            elapsed.as_secs_f64(),
            "-".repeat(RULE_WIDTH)
        )
    }

    pub(crate) fn format_time_stats(stats: &TimeStats) -> String {
        let mut table = Self::stats_table();
        let month = stats
            .popular_month
            .clone()
            .map(|m| month_name(m).unwrap_or("Unknown"));
        table.add_row(Self::counted_row("Most Popular Month", &month));
        let day = stats.popular_weekday.clone().map(weekday_name);
        table.add_row(Self::counted_row("Most Popular Day", &day));
        table.add_row(Self::counted_row("Most Popular Start Hour", &stats.popular_hour));
        table.to_string()
    }

    pub(crate) fn format_station_stats(stats: &StationStats) -> String {
        let mut table = Self::stats_table();
        table.add_row(Self::counted_row("Most Popular Start Station", &stats.popular_start));
        table.add_row(Self::counted_row("Most Popular End Station", &stats.popular_end));
        table.add_row(Self::counted_row("Most Frequent Trip", &stats.popular_trip));
        table.to_string()
    }

    pub(crate) fn format_duration_stats(stats: &DurationStats) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Statistic", b -> "Value"]);
        table.add_row(row!["Trips", r -> Self::count(stats.trip_count)]);
        table.add_row(row!["Total Travel Time", r -> Self::seconds(stats.total_secs)]);
        table.add_row(row!["Mean Travel Time", r -> Self::seconds(stats.mean_secs)]);
        table.to_string()
    }

    fn counts_table<T: ToString>(heading: &str, counts: &[Counted<T>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> heading, b -> "Trips"]);
        if counts.is_empty() {
            table.add_row(row!["(unknown)", r -> "-"]);
        }
        for counted in counts {
            table.add_row(row![counted.value.to_string(), r -> Self::count(counted.count)]);
        }
        table.to_string()
    }

    pub(crate) fn format_user_stats(stats: &UserStats) -> String {
        let mut output = Self::counts_table("User Type", &stats.user_types);

        if let Some(demographics) = &stats.demographics {
            output.push('\n');
            output.push_str(&Self::counts_table("Gender", &demographics.genders));
            output.push('\n');

            match &demographics.birth_years {
                Some(years) => {
                    let mut table = Self::stats_table();
                    table.add_row(Self::counted_row("Most Common Birth Year", &years.most_common));
                    table.add_row(row!["Most Recent Birth Year", years.most_recent, r -> "-"]);
                    table.add_row(row!["Earliest Birth Year", years.earliest, r -> "-"]);
                    output.push_str(&table.to_string());
                }
                None => output.push_str("Birth Year: no data\n"),
            }
        }

        output
    }
}

impl OutputFormatter for TableFormatter {
    fn format_report(&self, report: &TripReport) -> String {
        let mut output = format!(
            "\n{}\n",
            format!(
                "{}: {} trips (month: {}, day: {})",
                report.city.display_name(),
                Self::count(report.trip_count),
                report.filter.month_label(),
                report.filter.day_label()
            )
            .bold()
        );
        output.push_str(&"-".repeat(RULE_WIDTH));
        output.push('\n');

        output.push_str(&Self::section(
            "Calculating The Most Frequent Times of Travel...",
            &report.time,
            Self::format_time_stats,
        ));
        output.push_str(&Self::section(
            "Calculating The Most Popular Stations and Trip...",
            &report.stations,
            Self::format_station_stats,
        ));
        output.push_str(&Self::section(
            "Calculating Trip Duration...",
            &report.durations,
            Self::format_duration_stats,
        ));
        output.push_str(&Self::section(
            "Calculating User Stats...",
            &report.users,
            Self::format_user_stats,
        ));

        output
    }

    fn format_rows(&self, window: &RowWindow<'_>, show_demographics: bool) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        let mut titles = row![
            b -> "#",
            b -> "Start Time",
            b -> "End Time",
            b -> "Duration (s)",
            b -> "Start Station",
            b -> "End Station",
            b -> "User Type"
        ];
        if show_demographics {
            titles.add_cell(prettytable::Cell::new("Gender").style_spec("b"));
            titles.add_cell(prettytable::Cell::new("Birth Year").style_spec("b"));
        }
        table.set_titles(titles);

        for (i, trip) in window.rows.iter().enumerate() {
            let mut row = row![
                r -> window.offset + i,
                trip.start_time().format(TIMESTAMP_FORMAT),
                trip.end_time().format(TIMESTAMP_FORMAT),
                r -> trip.duration_secs(),
                trip.start_station(),
                trip.end_station(),
                trip.user_type().map(|u| u.to_string()).unwrap_or_default()
            ];
            if show_demographics {
                row.add_cell(prettytable::Cell::new(
                    &trip.gender().map(|g| g.to_string()).unwrap_or_default(),
                ));
                row.add_cell(prettytable::Cell::new(
                    &trip.birth_year().map(|y| y.to_string()).unwrap_or_default(),
                ));
            }
            table.add_row(row);
        }

        table.to_string()
    }
}

/// JSON formatter for machine-readable output
///
/// Absent statistics ("no data") are rendered as `null`.
pub struct JsonFormatter;

impl JsonFormatter {
    fn counted<T: Serialize>(key: &str, counted: &Counted<T>) -> Value {
        json!({ key: &counted.value, "count": counted.count })
    }

    fn time_stats(stats: &TimeStats) -> Value {
        json!({
            "most_common_month": {
                "month": stats.popular_month.value,
                "name": month_name(stats.popular_month.value),
                "count": stats.popular_month.count,
            },
            "most_common_day": {
                "day": weekday_name(stats.popular_weekday.value),
                "count": stats.popular_weekday.count,
            },
            "most_common_hour": Self::counted("hour", &stats.popular_hour),
        })
    }

    fn station_stats(stats: &StationStats) -> Value {
        json!({
            "most_common_start_station": Self::counted("station", &stats.popular_start),
            "most_common_end_station": Self::counted("station", &stats.popular_end),
            "most_common_trip": {
                "start_station": stats.popular_trip.value.start,
                "end_station": stats.popular_trip.value.end,
                "count": stats.popular_trip.count,
            },
        })
    }

    fn duration_stats(stats: &DurationStats) -> Value {
        json!({
            "trip_count": stats.trip_count,
            "total_secs": stats.total_secs,
            "mean_secs": stats.mean_secs,
        })
    }

    fn user_stats(stats: &UserStats) -> Value {
        let user_types: Vec<Value> = stats
            .user_types
            .iter()
            .map(|c| json!({ "user_type": c.value.as_str(), "count": c.count }))
            .collect();

        let demographics = stats.demographics.as_ref().map(|d| {
            json!({
                "genders": d.genders.iter()
                    .map(|c| json!({ "gender": c.value.as_str(), "count": c.count }))
                    .collect::<Vec<_>>(),
                "birth_years": d.birth_years.as_ref().map(|y| json!({
                    "most_common": Self::counted("year", &y.most_common),
                    "most_recent": y.most_recent,
                    "earliest": y.earliest,
                })),
            })
        });

        json!({
            "user_types": user_types,
            "demographics": demographics,
        })
    }

    fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &TripReport) -> String {
        let output = json!({
            "city": report.city.key(),
            "filter": {
                "month": report.filter.month_label(),
                "day": report.filter.day_label(),
            },
            "trip_count": report.trip_count,
            "time_stats": report.time.stats.as_ref().map(Self::time_stats),
            "station_stats": report.stations.stats.as_ref().map(Self::station_stats),
            "trip_duration_stats": report.durations.stats.as_ref().map(Self::duration_stats),
            "user_stats": report.users.stats.as_ref().map(Self::user_stats),
            "elapsed_secs": {
                "time_stats": report.time.elapsed.as_secs_f64(),
                "station_stats": report.stations.elapsed.as_secs_f64(),
                "trip_duration_stats": report.durations.elapsed.as_secs_f64(),
                "user_stats": report.users.elapsed.as_secs_f64(),
            },
        });

        Self::pretty(&output)
    }

    fn format_rows(&self, window: &RowWindow<'_>, show_demographics: bool) -> String {
        let rows: Vec<Value> = window
            .rows
            .iter()
            .enumerate()
            .map(|(i, trip)| Self::row(window.offset + i, trip, show_demographics))
            .collect();

        Self::pretty(&json!({ "offset": window.offset, "rows": rows }))
    }
}

impl JsonFormatter {
    fn row(index: usize, trip: &TripRecord, show_demographics: bool) -> Value {
        let mut row = json!({
            "index": index,
            "start_time": trip.start_time().format(TIMESTAMP_FORMAT).to_string(),
            "end_time": trip.end_time().format(TIMESTAMP_FORMAT).to_string(),
            "trip_duration": trip.duration_secs(),
            "start_station": trip.start_station(),
            "end_station": trip.end_station(),
            "user_type": trip.user_type().map(|u| u.as_str()),
            "month": trip.month(),
            "day_of_week": weekday_name(trip.weekday()),
            "hour": trip.hour(),
        });
        if show_demographics {
            row["gender"] = json!(trip.gender().map(|g| g.as_str()));
            row["birth_year"] = json!(trip.birth_year());
        }
        row
    }
}

/// Get the appropriate formatter based on output preference
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
