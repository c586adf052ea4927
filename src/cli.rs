//! CLI interface for bikestat
//!
//! This module defines the command-line interface using clap. Without
//! `--city` the explorer runs interactively; with it, a single report is
//! printed for the given filters.
//!
//! # Example
//!
//! ```bash
//! # Interactive explorer
//! bikestat
//!
//! # Mondays in March for Chicago, as JSON
//! bikestat --city chicago --month march --day monday --json
//!
//! # Every raw Washington row, then the report
//! bikestat --city washington --raw
//! ```

use crate::types::{City, DayChoice, MonthChoice};
use clap::Parser;
use std::path::PathBuf;

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(name = "bikestat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// City to report on (chicago, "new york city", washington); omit for the interactive explorer
    #[arg(long, short = 'c')]
    pub city: Option<City>,

    /// Month filter (january..june or all)
    #[arg(long, short = 'm', requires = "city")]
    pub month: Option<MonthChoice>,

    /// Day-of-week filter (sunday..saturday or all)
    #[arg(long, short = 'd', requires = "city")]
    pub day: Option<DayChoice>,

    /// Print every filtered raw row before the report
    #[arg(long, requires = "city")]
    pub raw: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show debug output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors, overriding RUST_LOG
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Month filter, defaulting to all months
    pub fn month_choice(&self) -> MonthChoice {
        self.month.unwrap_or_default()
    }

    /// Day filter, defaulting to every day
    pub fn day_choice(&self) -> DayChoice {
        self.day.unwrap_or_default()
    }
}
