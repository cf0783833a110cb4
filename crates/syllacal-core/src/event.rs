//! Event types for syllabus calendars.
//!
//! This module provides the value types the rest of the pipeline exchanges:
//! - [`EventCategory`]: what kind of deadline an event is
//! - [`Event`]: one calendar entry with a validated start/end

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{DEFAULT_EVENT_DURATION, SpanError, TimeSpan};

/// The kind of syllabus event.
///
/// `Assignment` is the default; `Exam` and `Project` are inferred from
/// keywords in the surrounding text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Exams, midterms and finals.
    Exam,
    /// Project milestones.
    Project,
    /// Everything else.
    #[default]
    Assignment,
}

impl EventCategory {
    /// Returns the lowercase identifier used in output and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Project => "project",
            Self::Assignment => "assignment",
        }
    }

    /// Returns a human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Exam => "Exam",
            Self::Project => "Project",
            Self::Assignment => "Assignment",
        }
    }
}

/// A calendar event derived from a syllabus.
///
/// Events are values: the collection never edits one in place, it swaps in a
/// replacement. The only invariant is `end >= start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event title (may be empty).
    pub title: String,
    /// When the event starts.
    pub start: NaiveDateTime,
    /// When the event ends.
    pub end: NaiveDateTime,
    /// The inferred or chosen category.
    pub category: EventCategory,
}

impl Event {
    /// Creates an event spanning `span`.
    pub fn new(title: impl Into<String>, span: TimeSpan, category: EventCategory) -> Self {
        Self {
            title: title.into(),
            start: span.start,
            end: span.end,
            category,
        }
    }

    /// Creates an event lasting [`DEFAULT_EVENT_DURATION`] from `start`.
    pub fn starting_at(
        title: impl Into<String>,
        start: NaiveDateTime,
        category: EventCategory,
    ) -> Self {
        Self::new(
            title,
            TimeSpan::from_duration(start, DEFAULT_EVENT_DURATION),
            category,
        )
    }

    /// Returns the event's span, or an error if the invariant is broken.
    ///
    /// Fields are public, so a hand-built or deserialized event can violate
    /// `end >= start`; consumers that need the guarantee go through this.
    pub fn span(&self) -> Result<TimeSpan, SpanError> {
        TimeSpan::new(self.start, self.end)
    }

    /// Returns true if `end >= start`.
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }

    /// Returns the duration of the event.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns true if the event starts at or after `now`.
    pub fn is_upcoming_at(&self, now: NaiveDateTime) -> bool {
        self.start >= now
    }

    /// Returns a copy with a different title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a different category.
    pub fn with_category(&self, category: EventCategory) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }
}
