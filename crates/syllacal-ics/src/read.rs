//! Reading exported calendars back.
//!
//! Used to verify an export: every `VEVENT` with a start is returned as an
//! [`IcsEntry`]; components without one are skipped.

use chrono::NaiveDateTime;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike,
    EventStatus,
};
use tracing::{debug, warn};

use crate::encoder::BUSY_STATUS_PROPERTY;
use crate::error::{IcsError, IcsResult};

/// One entry of a parsed calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEntry {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub uid: Option<String>,
    pub status: Option<String>,
    pub busy_status: Option<String>,
}

/// Parses `bytes` as an iCalendar stream.
///
/// # Errors
///
/// Fails when the bytes are not UTF-8 or not a calendar.
pub fn read_entries(bytes: &[u8]) -> IcsResult<Vec<IcsEntry>> {
    let text = std::str::from_utf8(bytes)?;
    let calendar = text.parse::<Calendar>().map_err(IcsError::parse)?;

    let entries: Vec<IcsEntry> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => read_event(event),
            _ => None,
        })
        .collect();

    debug!(entries = entries.len(), "Read calendar entries");
    Ok(entries)
}

fn read_event(event: &icalendar::Event) -> Option<IcsEntry> {
    let Some(start) = event.get_start() else {
        warn!(uid = ?event.get_uid(), "Skipping entry without DTSTART");
        return None;
    };
    let start = to_naive(start);
    let end = event.get_end().map_or(start, to_naive);

    Some(IcsEntry {
        summary: event.get_summary().unwrap_or_default().to_string(),
        start,
        end,
        uid: event.get_uid().map(str::to_string),
        status: event.get_status().map(|s| status_name(s).to_string()),
        busy_status: event.property_value(BUSY_STATUS_PROPERTY).map(str::to_string),
    })
}

/// Converts a calendar time to a floating local time; dates become midnight.
fn to_naive(value: DatePerhapsTime) -> NaiveDateTime {
    match value {
        DatePerhapsTime::Date(date) => date.and_time(chrono::NaiveTime::MIN),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive,
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(utc)) => utc.naive_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => date_time,
    }
}

fn status_name(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Tentative => "TENTATIVE",
        EventStatus::Confirmed => "CONFIRMED",
        EventStatus::Cancelled => "CANCELLED",
    }
}
