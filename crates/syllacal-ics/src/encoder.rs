//! iCalendar (RFC 5545) encoding of export records.
//!
//! Each record becomes one `VEVENT` with floating `DTSTART`/`DTEND`. The
//! `UID` is derived from the record's position, start and title, and
//! `DTSTAMP` is fixed by the encoder, so the same records always encode to
//! the same bytes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use icalendar::{Calendar, Component, Event, EventLike, EventStatus};
use sha2::{Digest, Sha256};
use syllacal_core::export::BUSY_STATUS_BUSY;
use syllacal_core::time::at_time;
use syllacal_core::{CalendarEncoder, DateTimeTuple, EncodingError, ExportRecord};
use tracing::debug;

/// Non-standard property Outlook reads for free/busy state.
pub const BUSY_STATUS_PROPERTY: &str = "X-MICROSOFT-CDO-BUSYSTATUS";

const UID_DOMAIN: &str = "syllacal";

/// Encodes export records as an iCalendar stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEncoder {
    stamp: DateTime<Utc>,
}

impl Default for IcsEncoder {
    fn default() -> Self {
        Self::new(NaiveDateTime::default().and_utc())
    }
}

impl IcsEncoder {
    /// Creates an encoder that writes `stamp` as every entry's `DTSTAMP`.
    pub fn new(stamp: DateTime<Utc>) -> Self {
        Self { stamp }
    }

    pub fn stamp(&self) -> DateTime<Utc> {
        self.stamp
    }

    fn entry(&self, index: usize, record: &ExportRecord) -> Result<Event, EncodingError> {
        let start = tuple_to_datetime(record.start).ok_or_else(|| {
            EncodingError::backend(format!("invalid start {:?} for {:?}", record.start, record.title))
        })?;
        let end = tuple_to_datetime(record.end).ok_or_else(|| {
            EncodingError::backend(format!("invalid end {:?} for {:?}", record.end, record.title))
        })?;
        if end < start {
            return Err(EncodingError::invalid_span(index, &record.title));
        }

        let mut event = Event::new();
        event
            .uid(&entry_uid(index, start, &record.title))
            .timestamp(self.stamp)
            .summary(&record.title)
            .starts(start)
            .ends(end)
            .status(parse_status(&record.status))
            .add_property(BUSY_STATUS_PROPERTY, busy_status(&record.busy_status));
        Ok(event.done())
    }
}

impl CalendarEncoder for IcsEncoder {
    fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, EncodingError> {
        if records.is_empty() {
            return Err(EncodingError::EmptyCollection);
        }

        let mut calendar = Calendar::new();
        for (index, record) in records.iter().enumerate() {
            calendar.push(self.entry(index, record)?);
        }
        let text = calendar.done().to_string();

        debug!(entries = records.len(), bytes = text.len(), "Encoded calendar");
        Ok(text.into_bytes())
    }
}

/// Stable identifier for the entry at `index`.
fn entry_uid(index: usize, start: NaiveDateTime, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update((index as u64).to_le_bytes());
    hasher.update(start.and_utc().timestamp().to_le_bytes());
    hasher.update(title.as_bytes());
    format!("{}@{UID_DOMAIN}", hex::encode(hasher.finalize()))
}

fn tuple_to_datetime((year, month, day, hour, minute): DateTimeTuple) -> Option<NaiveDateTime> {
    at_time(NaiveDate::from_ymd_opt(year, month, day)?, hour, minute)
}

fn parse_status(status: &str) -> EventStatus {
    match status.to_ascii_uppercase().as_str() {
        "TENTATIVE" => EventStatus::Tentative,
        "CANCELLED" => EventStatus::Cancelled,
        _ => EventStatus::Confirmed,
    }
}

fn busy_status(value: &str) -> &str {
    if value.is_empty() { BUSY_STATUS_BUSY } else { value }
}
