//! Session and export error types.

use thiserror::Error;

use crate::time::SpanError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised while encoding events into a calendar stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// There was nothing to encode.
    #[error("no events to encode")]
    EmptyCollection,

    /// An event ends before it starts.
    #[error("event #{index} ({title:?}) ends before it starts")]
    InvalidSpan { index: usize, title: String },

    /// The encoding backend failed.
    #[error("calendar backend error: {0}")]
    Backend(String),
}

impl EncodingError {
    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates an invalid span error.
    pub fn invalid_span(index: usize, title: impl Into<String>) -> Self {
        Self::InvalidSpan {
            index,
            title: title.into(),
        }
    }
}

/// Errors that can occur during a session.
///
/// Every variant is recoverable: the operation that raised it is aborted and
/// the session's events are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Extraction was invoked with empty or whitespace-only text.
    #[error("Please upload or paste a syllabus first!")]
    NoInput,

    /// Export was invoked with no events.
    #[error("No events to export!")]
    EmptyExport,

    /// The encoder failed.
    #[error("Export failed: {0}")]
    Encoding(#[from] EncodingError),

    /// A manual span ends before it starts.
    #[error("Invalid time span: {0}")]
    InvalidSpan(#[from] SpanError),

    /// A manual event was given an empty title.
    #[error("Event title must not be empty")]
    EmptyTitle,

    /// An edit referenced a position past the end of the collection.
    #[error("No event at position {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl SessionError {
    /// Creates an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}
