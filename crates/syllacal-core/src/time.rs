//! Time types for syllabus events.
//!
//! All instants are floating local times ([`NaiveDateTime`]): a syllabus says
//! "Oct 15 at 2pm" without a timezone, and the exported calendar keeps it that
//! way. This module provides [`TimeSpan`] for validated start/end pairs and a
//! few helpers shared by the pipeline.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed duration given to every extracted event.
pub const DEFAULT_EVENT_DURATION: Duration = Duration::minutes(60);

/// Window in which a future event is displayed as imminent.
pub const IMMINENT_WINDOW: Duration = Duration::hours(24);

/// A (year, month 1-based, day, hour, minute) tuple.
pub type DateTimeTuple = (i32, u32, u32, u32, u32);

/// Error returned when a span ends before it starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("span ends before it starts ({start} > {end})")]
pub struct SpanError {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A closed time span `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start of the span.
    pub start: NaiveDateTime,
    /// End of the span (never before `start`).
    pub end: NaiveDateTime,
}

impl TimeSpan {
    /// Creates a new span.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError`] if `end` is before `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, SpanError> {
        if end < start {
            return Err(SpanError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a span from a start time and a non-negative duration.
    ///
    /// Negative durations are clamped to zero.
    pub fn from_duration(start: NaiveDateTime, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration.max(Duration::zero()),
        }
    }

    /// Returns the duration of this span.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if an instant falls within this span (both ends inclusive).
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Splits an instant into a [`DateTimeTuple`] (seconds are dropped).
pub fn to_tuple(at: NaiveDateTime) -> DateTimeTuple {
    use chrono::Timelike;
    (at.year(), at.month(), at.day(), at.hour(), at.minute())
}

/// Combines a date with an hour/minute pair, returning `None` when out of range.
pub fn at_time(date: NaiveDate, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| date.and_time(t))
}

/// Returns `true` if `start` is at or after `now` and less than
/// [`IMMINENT_WINDOW`] away.
pub fn is_within_imminent_window(start: NaiveDateTime, now: NaiveDateTime) -> bool {
    start >= now && start - now < IMMINENT_WINDOW
}
