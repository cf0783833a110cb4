//! Command-line interface definition.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use syllacal_core::LogFormat;

/// syllacal - Turn a syllabus into calendar events
#[derive(Debug, Parser)]
#[command(name = "syllacal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SYLLACAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format on stderr: compact, pretty or json
    #[arg(
        long,
        env = "SYLLACAL_LOG_FORMAT",
        default_value = "compact",
        value_parser = parse_log_format
    )]
    pub log_format: LogFormat,

    /// Reference time instead of the current local time (e.g. 2024-09-01T09:00)
    #[arg(long, value_parser = parse_datetime)]
    pub now: Option<NaiveDateTime>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the syllabus text comes from and how to read its dates.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Syllabus text file; reads stdin when absent or "-"
    pub input: Option<PathBuf>,

    /// Read numeric dates as day/month instead of month/day
    #[arg(long)]
    pub day_first: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract events and list them
    Extract {
        #[command(flatten)]
        source: InputArgs,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,

        /// Add an event by hand: START..END=Title (can be repeated)
        #[arg(long = "add", value_name = "SPEC", action = clap::ArgAction::Append)]
        add: Vec<ManualEvent>,
    },

    /// Show the next upcoming events
    Upcoming {
        #[command(flatten)]
        source: InputArgs,

        /// Maximum number of events to show
        #[arg(long)]
        limit: Option<usize>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the events to an .ics file
    Export {
        #[command(flatten)]
        source: InputArgs,

        /// Output file (defaults to syllabus-calendar.ics in the export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Parse the written file back and check every event is present
        #[arg(long)]
        verify: bool,
    },

    /// Send desktop reminders for future events
    Notify {
        #[command(flatten)]
        source: InputArgs,

        /// Print the reminders instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the current configuration
    Dump,
    /// Validate the configuration file
    Validate,
    /// Show configuration file path
    Path,
}

/// A manual event given on the command line as `START..END=Title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl FromStr for ManualEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (span, title) = s
            .split_once('=')
            .ok_or_else(|| format!("expected START..END=Title, got {s:?}"))?;
        let (start, end) = span
            .split_once("..")
            .ok_or_else(|| format!("expected START..END before '=', got {span:?}"))?;
        Ok(Self {
            start: parse_datetime(start)?,
            end: parse_datetime(end)?,
            title: title.to_string(),
        })
    }
}

/// Parses `YYYY-MM-DD[THH:MM[:SS]]` (a space may replace the `T`).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| format!("invalid date/time {s:?}, expected e.g. 2024-09-01T09:00"))
}

/// Parses `compact`, `pretty` or `json`.
pub fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse().map_err(|e: syllacal_core::TracingError| e.to_string())
}
