//! Calendar export records and the encoder seam.
//!
//! The core never writes calendar bytes itself. It normalizes events into
//! [`ExportRecord`]s and hands them to a [`CalendarEncoder`]; the ICS encoder
//! lives in its own crate.

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;
use crate::event::Event;
use crate::time::{DateTimeTuple, to_tuple};

/// Suggested file name for exported calendars.
pub const EXPORT_FILE_NAME: &str = "syllabus-calendar.ics";

/// Content type of exported calendars.
pub const EXPORT_CONTENT_TYPE: &str = "text/calendar;charset=utf-8";

/// Entry status written for every record.
pub const STATUS_CONFIRMED: &str = "CONFIRMED";

/// Free/busy marker written for every record.
pub const BUSY_STATUS_BUSY: &str = "BUSY";

/// One event, normalized for an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub start: DateTimeTuple,
    pub end: DateTimeTuple,
    pub title: String,
    pub status: String,
    pub busy_status: String,
}

impl ExportRecord {
    fn from_event(event: &Event) -> Self {
        Self {
            start: to_tuple(event.start),
            end: to_tuple(event.end),
            title: event.title.clone(),
            status: STATUS_CONFIRMED.to_string(),
            busy_status: BUSY_STATUS_BUSY.to_string(),
        }
    }
}

/// Serializes export records into a calendar byte stream.
pub trait CalendarEncoder {
    /// Encodes `records`, one entry per record, in order.
    fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, EncodingError>;
}

/// An encoded calendar ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Wraps encoded bytes with the default file name and content type.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            content_type: EXPORT_CONTENT_TYPE.to_string(),
            bytes,
        }
    }
}

/// Normalizes `events` for encoding.
///
/// # Errors
///
/// [`EncodingError::EmptyCollection`] when there are no events, and
/// [`EncodingError::InvalidSpan`] for the first event that ends before it starts.
pub fn export_records(events: &[Event]) -> Result<Vec<ExportRecord>, EncodingError> {
    if events.is_empty() {
        return Err(EncodingError::EmptyCollection);
    }
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            if event.is_well_formed() {
                Ok(ExportRecord::from_event(event))
            } else {
                Err(EncodingError::invalid_span(index, &event.title))
            }
        })
        .collect()
}

/// Normalizes and encodes `events` into an [`ExportFile`].
pub fn encode_events(
    events: &[Event],
    encoder: &dyn CalendarEncoder,
) -> Result<ExportFile, EncodingError> {
    let records = export_records(events)?;
    let bytes = encoder.encode(&records)?;
    Ok(ExportFile::new(bytes))
}
