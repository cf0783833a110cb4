//! Presentation helpers for syllabus events.
//!
//! This module provides what a calendar renderer or terminal front end needs
//! to display events:
//! - **Colors**: [`ColorToken`] per event (category color, imminent override)
//!   and a softer tint for upcoming lists
//! - **View**: [`CalendarView`], the renderer contract (events, anchor, colors)
//! - **TTY**: human-readable lines
//! - **JSON**: machine-readable output

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventCategory};
use crate::reminder::is_imminent;


/// Display color class of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Exam,
    Project,
    Assignment,
    /// Starts in the future and within the next 24 hours.
    Imminent,
}

impl ColorToken {
    /// Returns the class name for this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Project => "project",
            Self::Assignment => "assignment",
            Self::Imminent => "imminent",
        }
    }

    /// Returns the hex color for calendar cells.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Exam => "#ef4444",
            Self::Project => "#10b981",
            Self::Assignment => "#3b82f6",
            Self::Imminent => "#facc15",
        }
    }

    fn for_category(category: EventCategory) -> Self {
        match category {
            EventCategory::Exam => Self::Exam,
            EventCategory::Project => Self::Project,
            EventCategory::Assignment => Self::Assignment,
        }
    }
}

/// Color for `event` at `now`: imminent overrides the category color.
pub fn color_for(event: &Event, now: NaiveDateTime) -> ColorToken {
    if is_imminent(event, now) {
        ColorToken::Imminent
    } else {
        ColorToken::for_category(event.category)
    }
}

/// Background tint used for rows of the upcoming list.
pub fn list_tint(category: EventCategory) -> &'static str {
    match category {
        EventCategory::Exam => "#fee2e2",
        EventCategory::Project => "#d1fae5",
        EventCategory::Assignment => "#dbeafe",
    }
}

/// What a calendar renderer receives from a session.
#[derive(Debug, Clone, Copy)]
pub struct CalendarView<'a> {
    /// Every event, in insertion order.
    pub events: &'a [Event],
    /// The date the renderer should initially show.
    pub anchor: NaiveDateTime,
    now: NaiveDateTime,
}

impl<'a> CalendarView<'a> {
    pub fn new(events: &'a [Event], anchor: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            events,
            anchor,
            now,
        }
    }

    /// Color class of `event` relative to the view's "now".
    pub fn color_of(&self, event: &Event) -> ColorToken {
        color_for(event, self.now)
    }
}

/// Time format preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// 12-hour format with AM/PM (e.g., "2:30 PM").
    #[default]
    #[serde(rename = "12h")]
    H12,
    /// 24-hour format (e.g., "14:30").
    #[serde(rename = "24h")]
    H24,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum length for titles (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Time format preference.
    pub time_format: TimeFormat,
}

/// A formatted event line with its color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedEvent {
    pub text: String,
    pub color: ColorToken,
}

/// JSON output for machine consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// All events, chronologically.
    pub events: Vec<JsonEvent>,
    /// The upcoming selection.
    pub upcoming: Vec<JsonEvent>,
    /// Number of events.
    pub count: usize,
}

/// A single event in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEvent {
    pub title: String,
    /// Start time in ISO 8601 format.
    pub start: String,
    /// End time in ISO 8601 format.
    pub end: String,
    pub category: EventCategory,
    /// Formatted time string for display.
    pub time_display: String,
    pub color: ColorToken,
    pub hex: String,
    pub tint: String,
    pub imminent: bool,
}

/// Output formatter for events.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Formats events as terminal lines.
    pub fn format_tty_at<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
        now: NaiveDateTime,
    ) -> Vec<FormattedEvent> {
        events
            .into_iter()
            .map(|event| {
                let color = color_for(event, now);
                let marker = if color == ColorToken::Imminent { "!" } else { " " };
                FormattedEvent {
                    text: format!(
                        "{marker} {} [{}] {}",
                        self.format_when(event.start),
                        event.category.as_str(),
                        self.truncate_title(&event.title)
                    ),
                    color,
                }
            })
            .collect()
    }

    /// Formats the events and the upcoming selection as JSON output.
    pub fn format_json_at<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
        upcoming: impl IntoIterator<Item = &'a Event>,
        now: NaiveDateTime,
    ) -> JsonOutput {
        let events: Vec<JsonEvent> = events
            .into_iter()
            .map(|e| self.to_json_event(e, now))
            .collect();
        let upcoming = upcoming
            .into_iter()
            .map(|e| self.to_json_event(e, now))
            .collect();

        JsonOutput {
            count: events.len(),
            events,
            upcoming,
        }
    }

    /// Formats a start instant as date plus time of day.
    pub fn format_when(&self, at: NaiveDateTime) -> String {
        let time = match self.options.time_format {
            TimeFormat::H12 => at.format("%-I:%M %p"),
            TimeFormat::H24 => at.format("%H:%M"),
        };
        format!("{} {}", at.format("%a %b %d %Y"), time)
    }

    fn truncate_title<'t>(&self, title: &'t str) -> Cow<'t, str> {
        match self.options.max_title_length {
            Some(max) => ellipsis(title, max),
            None => Cow::Borrowed(title),
        }
    }

    fn to_json_event(&self, event: &Event, now: NaiveDateTime) -> JsonEvent {
        let color = color_for(event, now);
        JsonEvent {
            title: self.truncate_title(&event.title).into_owned(),
            start: event.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end: event.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            category: event.category,
            time_display: self.format_when(event.start),
            color,
            hex: color.hex().to_string(),
            tint: list_tint(event.category).to_string(),
            imminent: color == ColorToken::Imminent,
        }
    }
}

/// Truncates a string to `max_len` characters, ending in "..." when cut.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{truncated}..."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    mod ellipsis {
        use super::*;

        #[test]
        fn short_string_unchanged() {
            assert_eq!(ellipsis("Quiz", 10), "Quiz");
        }

        #[test]
        fn long_string_truncated() {
            assert_eq!(ellipsis("Midterm exam review", 10), "Midterm...");
        }

        #[test]
        fn zero_length() {
            assert_eq!(ellipsis("Quiz", 0), "");
        }
    }

    mod colors {
        use super::*;

        #[test]
        fn category_palette() {
            let now = dt(2024, 9, 1, 9, 0);
            let start = dt(2024, 10, 1, 9, 0);
            let exam = Event::starting_at("e", start, EventCategory::Exam);
            let project = Event::starting_at("p", start, EventCategory::Project);
            let other = Event::starting_at("a", start, EventCategory::Assignment);
            assert_eq!(color_for(&exam, now).hex(), "#ef4444");
            assert_eq!(color_for(&project, now).hex(), "#10b981");
            assert_eq!(color_for(&other, now).hex(), "#3b82f6");
        }

        #[test]
        fn imminent_overrides_category() {
            let now = dt(2024, 10, 1, 9, 0);
            let exam = Event::starting_at("e", dt(2024, 10, 1, 20, 0), EventCategory::Exam);
            assert_eq!(color_for(&exam, now), ColorToken::Imminent);
            assert_eq!(color_for(&exam, now).hex(), "#facc15");
            // Past events keep their category color.
            assert_eq!(color_for(&exam, dt(2024, 10, 2, 9, 0)), ColorToken::Exam);
        }

        #[test]
        fn tints() {
            assert_eq!(list_tint(EventCategory::Exam), "#fee2e2");
            assert_eq!(list_tint(EventCategory::Project), "#d1fae5");
            assert_eq!(list_tint(EventCategory::Assignment), "#dbeafe");
        }

        #[test]
        fn view_uses_its_now() {
            let events = vec![Event::starting_at("e", dt(2024, 10, 1, 20, 0), EventCategory::Exam)];
            let view = CalendarView::new(&events, dt(2024, 10, 1, 20, 0), dt(2024, 10, 1, 9, 0));
            assert_eq!(view.color_of(&events[0]), ColorToken::Imminent);
            assert_eq!(view.events.len(), 1);
        }
    }

    mod time_format {
        use super::*;

        #[test]
        fn twelve_and_twenty_four_hour() {
            let at = dt(2024, 10, 15, 14, 5);
            let h12 = OutputFormatter::default();
            assert_eq!(h12.format_when(at), "Tue Oct 15 2024 2:05 PM");

            let h24 = OutputFormatter::new(FormatOptions {
                time_format: TimeFormat::H24,
                ..Default::default()
            });
            assert_eq!(h24.format_when(at), "Tue Oct 15 2024 14:05");
        }

        #[test]
        fn serde_names() {
            assert_eq!(serde_json::to_string(&TimeFormat::H12).unwrap(), "\"12h\"");
            let parsed: TimeFormat = serde_json::from_str("\"24h\"").unwrap();
            assert_eq!(parsed, TimeFormat::H24);
        }
    }
}
