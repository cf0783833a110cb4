//! Error types for reading exported calendars.

use thiserror::Error;

/// Result type for ICS read-back.
pub type IcsResult<T> = Result<T, IcsError>;

/// Errors that can occur while reading an ICS stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IcsError {
    /// The bytes are not valid UTF-8.
    #[error("calendar is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The text is not a valid iCalendar document.
    #[error("failed to parse calendar: {message}")]
    Parse { message: String },
}

impl IcsError {
    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
