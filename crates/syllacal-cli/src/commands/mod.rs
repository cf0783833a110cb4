//! Subcommand implementations.
//!
//! Commands write to a caller-supplied sink so they can be driven from tests.

pub mod config;
pub mod export;
pub mod extract;
pub mod notify;
pub mod upcoming;

use chrono::NaiveDateTime;
use syllacal_core::{DateOrder, LocatorOptions, OutputFormatter, Session};

use crate::cli::InputArgs;
use crate::config::Config;
use crate::error::CliResult;
use crate::input::read_input;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub now: NaiveDateTime,
}

impl Context {
    pub fn new(config: Config, now: NaiveDateTime) -> Self {
        Self { config, now }
    }

    /// Locale settings, with `--day-first` taking precedence.
    pub fn locator_options(&self, source: &InputArgs) -> LocatorOptions {
        let mut options = self.config.locale;
        if source.day_first {
            options.date_order = DateOrder::DayFirst;
        }
        options
    }

    /// Reads the syllabus and runs extraction over it.
    pub fn load_session(&self, source: &InputArgs) -> CliResult<Session> {
        let text = read_input(source.input.as_deref())?;
        let mut session = Session::with_options(self.now, self.locator_options(source));
        session.extract(&text, self.now)?;
        Ok(session)
    }

    pub fn formatter(&self) -> OutputFormatter {
        OutputFormatter::new(self.config.format_options())
    }
}
