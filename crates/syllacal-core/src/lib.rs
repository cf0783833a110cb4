//! Core of syllacal: turns syllabus text into calendar events.
//!
//! Pipeline: [`locate`] finds temporal expressions, [`classify`] picks a
//! category, [`builder`] makes events, and a [`Session`] owns the resulting
//! [`EventCollection`] for export and reminders.

pub mod builder;
pub mod classify;
pub mod collection;
pub mod error;
pub mod event;
pub mod export;
pub mod format;
pub mod locate;
pub mod reminder;
pub mod session;
pub mod time;
pub mod tracing;

pub use builder::{build_event, extract_events};
pub use classify::{CategoryRule, DEFAULT_RULES, classify, classify_with};
pub use collection::EventCollection;
pub use error::{EncodingError, SessionError, SessionResult};
pub use event::{Event, EventCategory};
pub use export::{
    CalendarEncoder, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, ExportFile, ExportRecord,
    encode_events, export_records,
};
pub use format::{
    CalendarView, ColorToken, FormatOptions, FormattedEvent, JsonEvent, JsonOutput,
    OutputFormatter, TimeFormat, color_for, ellipsis, list_tint,
};
pub use locate::{DateOrder, LocatorOptions, Matches, TemporalLocator, TemporalMatch, YearPolicy};
pub use reminder::{NotificationSink, Reminder, dispatch_reminders, is_imminent, reminder_for};
pub use session::Session;
pub use time::{DEFAULT_EVENT_DURATION, DateTimeTuple, SpanError, TimeSpan};
pub use self::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
