//! Validated console prompts
//!
//! Every filter kind the explorer asks for is a [`Choice`]: a type with a
//! fixed set of accepted values, its own question and its own parser.
//! [`Prompter::ask`] keeps asking until the answer parses, so callers only
//! ever see valid cities, months and days.
//!
//! # Examples
//!
//! ```
//! use bikestat::prompt::Prompter;
//! use bikestat::types::{City, MonthChoice, TripMonth};
//!
//! let input = b"boston\nchicago\nMarch\n";
//! let mut prompter = Prompter::new(&input[..], Vec::new());
//!
//! assert_eq!(prompter.ask::<City>().unwrap(), City::Chicago);
//! assert_eq!(
//!     prompter.ask::<MonthChoice>().unwrap(),
//!     MonthChoice::Month(TripMonth::March)
//! );
//! ```

use crate::error::{BikestatError, Result};
use crate::types::{City, DayChoice, MonthChoice};
use std::io::{BufRead, Write};
use tracing::debug;

/// A value picked from a fixed domain at a prompt
pub trait Choice: Sized {
    /// Name of the filter kind, used in messages
    const KIND: &'static str;

    /// Question shown to the user
    const PROMPT: &'static str;

    /// Accepted answers, in display order
    fn options() -> &'static [&'static str];

    /// Parse a trimmed answer, case-insensitively
    fn parse_choice(input: &str) -> Result<Self>;
}

impl Choice for City {
    const KIND: &'static str = "city";
    const PROMPT: &'static str =
        "Would you like to see data for Chicago, New York City, or Washington?";

    fn options() -> &'static [&'static str] {
        &["chicago", "new york city", "washington"]
    }

    fn parse_choice(input: &str) -> Result<Self> {
        input.parse()
    }
}

impl Choice for MonthChoice {
    const KIND: &'static str = "month";
    const PROMPT: &'static str =
        "Which month? January, February, March, April, May, June, or all?";

    fn options() -> &'static [&'static str] {
        &MonthChoice::OPTIONS
    }

    fn parse_choice(input: &str) -> Result<Self> {
        input.parse()
    }
}

impl Choice for DayChoice {
    const KIND: &'static str = "day";
    const PROMPT: &'static str = "Which day? Sunday, Monday, Tuesday, Wednesday, Thursday, \
                                  Friday, Saturday, or all?";

    fn options() -> &'static [&'static str] {
        &DayChoice::OPTIONS
    }

    fn parse_choice(input: &str) -> Result<Self> {
        input.parse()
    }
}

/// Interpret a yes/no answer
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Console prompter over any line-based input and writable output
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The output stream, for writing reports between prompts
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `question` and read one trimmed line
    ///
    /// Fails with [`BikestatError::InputClosed`] at end of input.
    pub fn read_answer(&mut self, question: &str) -> Result<String> {
        writeln!(self.output, "{question}")?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BikestatError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask for a `T` until the answer is valid
    pub fn ask<T: Choice>(&mut self) -> Result<T> {
        loop {
            let answer = self.read_answer(T::PROMPT)?;
            match T::parse_choice(&answer) {
                Ok(choice) => {
                    debug!("Selected {} '{}'", T::KIND, answer);
                    return Ok(choice);
                }
                Err(_) => {
                    writeln!(
                        self.output,
                        "Invalid {} '{}'. Please enter one of: {}",
                        T::KIND,
                        answer,
                        T::options().join(", ")
                    )?;
                }
            }
        }
    }

    /// Yes/no question that repeats until it gets a yes or a no
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let answer = self.read_answer(question)?;
            match parse_answer(&answer) {
                Some(yes) => return Ok(yes),
                None => writeln!(self.output, "Wrong input!")?,
            }
        }
    }

    /// Yes/no question where anything but yes counts as no
    pub fn confirm_lenient(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_answer(question)?;
        Ok(parse_answer(&answer).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripMonth;
    use chrono::Weekday;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn transcript(prompter: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("yes"), Some(true));
        assert_eq!(parse_answer(" Y "), Some(true));
        assert_eq!(parse_answer("NO"), Some(false));
        assert_eq!(parse_answer("n"), Some(false));
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[test]
    fn test_ask_city_is_case_insensitive() {
        let mut p = prompter("  New York City \n");
        assert_eq!(p.ask::<City>().unwrap(), City::NewYorkCity);
        assert!(transcript(p).contains(City::PROMPT));
    }

    #[test]
    fn test_ask_reprompts_on_invalid_input() {
        let mut p = prompter("july\nfebruary\n");
        assert_eq!(
            p.ask::<MonthChoice>().unwrap(),
            MonthChoice::Month(TripMonth::February)
        );

        let output = transcript(p);
        assert!(output.contains("Invalid month 'july'"));
        assert!(output.contains("january, february, march, april, may, june, all"));
        assert_eq!(output.matches(MonthChoice::PROMPT).count(), 2);
    }

    #[test]
    fn test_ask_day() {
        let mut p = prompter("ALL\nfriday\n");
        assert_eq!(p.ask::<DayChoice>().unwrap(), DayChoice::All);
        assert_eq!(p.ask::<DayChoice>().unwrap(), DayChoice::Day(Weekday::Fri));
    }

    #[test]
    fn test_end_of_input_is_an_error() {
        let mut p = prompter("toronto\n");
        assert!(matches!(
            p.ask::<City>(),
            Err(BikestatError::InputClosed)
        ));
    }

    #[test]
    fn test_confirm_is_strict() {
        let mut p = prompter("sure\nyes\n");
        assert!(p.confirm("Continue?").unwrap());
        assert!(transcript(p).contains("Wrong input!"));
    }

    #[test]
    fn test_confirm_lenient_treats_unknown_as_no() {
        let mut p = prompter("sure\nyes\n");
        assert!(!p.confirm_lenient("Continue?").unwrap());
        assert!(p.confirm_lenient("Continue?").unwrap());
    }
}
