//! CLI error types.

use std::fmt;

use syllacal_core::SessionError;
use syllacal_ics::IcsError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),
    /// IO error.
    Io(std::io::Error),
    /// Session error (no input, empty export, encoder failure, bad manual event).
    Session(SessionError),
    /// The written calendar did not read back correctly.
    Verify(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Session(err) => write!(f, "{}", err),
            Self::Verify(msg) => write!(f, "export verification failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<IcsError> for CliError {
    fn from(err: IcsError) -> Self {
        Self::Verify(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.into())
    }
}
