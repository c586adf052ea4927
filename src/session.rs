//! Explorer session driver
//!
//! A [`Session`] ties a [`DatasetSource`], a [`Prompter`] and an
//! [`OutputFormatter`] together. It either runs the interactive loop
//! (prompt for city, month and day, show raw rows on request, print the
//! report, offer a restart) or a single non-interactive pass.
//!
//! The session is generic over its input and output streams so tests can
//! drive it with in-memory buffers.

use crate::aggregation::{Aggregator, RawRowPager};
use crate::error::{BikestatError, Result};
use crate::filters::TripFilter;
use crate::output::{OutputFormatter, get_formatter};
use crate::prompt::Prompter;
use crate::provider::DatasetSource;
use crate::types::{City, Dataset, DayChoice, MonthChoice};
use std::io::{BufRead, Write};
use tracing::{info, warn};

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const RAW_DATA_QUESTION: &str = "Do you wish to view the raw bikeshare data? Enter yes or no.";
const MORE_DATA_QUESTION: &str = "Do you wish to view more data? Enter yes or no.";
const RESTART_QUESTION: &str = "Would you like to restart? Enter yes or no.";
const RULE_WIDTH: usize = 40;

/// One explorer run over a dataset source
pub struct Session<S, R, W> {
    source: S,
    prompter: Prompter<R, W>,
    formatter: Box<dyn OutputFormatter>,
}

impl<S, R, W> Session<S, R, W>
where
    S: DatasetSource,
    R: BufRead,
    W: Write,
{
    /// Session printing tables
    pub fn new(source: S, input: R, output: W) -> Self {
        Self {
            source,
            prompter: Prompter::new(input, output),
            formatter: get_formatter(false),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn OutputFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Switch between table and JSON output
    pub fn with_json(self, json: bool) -> Self {
        self.with_formatter(get_formatter(json))
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run the prompt → report loop until the user declines to restart
    ///
    /// Dataset errors are printed and the user may try again. End of
    /// input ends the session with [`BikestatError::InputClosed`].
    pub fn run_interactive(&mut self) -> Result<()> {
        writeln!(self.prompter.output(), "{GREETING}")?;

        loop {
            let city: City = self.prompter.ask()?;
            let month: MonthChoice = self.prompter.ask()?;
            let day: DayChoice = self.prompter.ask()?;
            writeln!(self.prompter.output(), "{}", "-".repeat(RULE_WIDTH))?;

            let filter = TripFilter::from_choices(month, day);
            info!("Exploring {} with {}", city.display_name(), filter);

            match self.explore(city, &filter) {
                Ok(()) => {}
                Err(BikestatError::InputClosed) => return Err(BikestatError::InputClosed),
                Err(e) => {
                    warn!("Exploration of {} failed: {}", city.display_name(), e);
                    writeln!(self.prompter.output(), "Error: {e}")?;
                }
            }

            writeln!(self.prompter.output())?;
            if !self.prompter.confirm_lenient(RESTART_QUESTION)? {
                break;
            }
        }

        Ok(())
    }

    /// Load, filter and report once without prompting
    ///
    /// With `raw` set every filtered row is printed, window by window,
    /// before the report.
    pub fn run_once(&mut self, city: City, filter: &TripFilter, raw: bool) -> Result<()> {
        let dataset = self.source.load_filtered(city, filter)?;

        if raw {
            for window in RawRowPager::new(dataset.trips()) {
                let rows = self
                    .formatter
                    .format_rows(&window, dataset.has_demographics());
                writeln!(self.prompter.output(), "{rows}")?;
            }
        }

        self.print_report(&dataset, filter)
    }

    fn explore(&mut self, city: City, filter: &TripFilter) -> Result<()> {
        let dataset = self.source.load_filtered(city, filter)?;
        self.view_raw_rows(&dataset)?;
        self.print_report(&dataset, filter)
    }

    fn print_report(&mut self, dataset: &Dataset, filter: &TripFilter) -> Result<()> {
        let report = Aggregator::report(dataset, filter);
        let formatted = self.formatter.format_report(&report);
        writeln!(self.prompter.output(), "{formatted}")?;
        Ok(())
    }

    /// Page through raw rows while the user keeps asking for more
    fn view_raw_rows(&mut self, dataset: &Dataset) -> Result<()> {
        if !self.prompter.confirm(RAW_DATA_QUESTION)? {
            return Ok(());
        }
        if dataset.is_empty() {
            writeln!(self.prompter.output(), "No rows to display.")?;
            return Ok(());
        }

        let mut pager = RawRowPager::new(dataset.trips());
        while let Some(window) = pager.next() {
            let rows = self
                .formatter
                .format_rows(&window, dataset.has_demographics());
            writeln!(self.prompter.output(), "{rows}")?;

            if pager.is_exhausted() {
                writeln!(self.prompter.output(), "No more rows to display.")?;
                break;
            }
            if !self.prompter.confirm_lenient(MORE_DATA_QUESTION)? {
                break;
            }
        }

        Ok(())
    }
}
