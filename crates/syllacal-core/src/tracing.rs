//! Log setup shared by the syllacal binaries.
//!
//! Everything goes to stderr; stdout carries command output (event lists,
//! JSON) and must stay clean.
//!
//! ```ignore
//! use syllacal_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::for_cli(true))?;
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

/// Crates whose events pass the default filter.
const TARGETS: &[&str] = &["syllacal", "syllacal_cli", "syllacal_core", "syllacal_ics"];

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("tracing is already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("unknown log format {0:?}, expected compact, pretty or json")]
    UnknownFormat(String),
}

/// Line format of emitted logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One compact line per event.
    #[default]
    Compact,
    /// Multi-line, human-oriented output.
    Pretty,
    /// JSON lines.
    Json,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json];

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TracingError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for syllacal crates when no filter is given.
    pub level: Level,
    pub format: LogFormat,
    /// Prefix each line with its source file and line.
    pub source_location: bool,
    pub timestamps: bool,
    /// Explicit filter; beats both `RUST_LOG` and `level`.
    pub directive: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_cli(false)
    }
}

impl TracingConfig {
    /// Quiet (warnings only) unless `debug`.
    pub fn for_cli(debug: bool) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::WARN },
            format: LogFormat::Compact,
            source_location: debug,
            timestamps: false,
            directive: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// `syllacal=<level>,syllacal_cli=<level>,...` for every workspace crate.
    pub fn default_directive(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Resolves the filter: explicit directive, then `RUST_LOG`, then the level.
    ///
    /// # Errors
    ///
    /// Fails only when the explicit directive does not parse.
    pub fn filter(&self) -> Result<EnvFilter, TracingError> {
        match self.directive {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.source_location)
            .with_line_number(self.source_location);

        match (self.format, self.timestamps) {
            (LogFormat::Json, _) => base.json().boxed(),
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// [`TracingError::Filter`] for a bad directive, and
/// [`TracingError::AlreadyInitialized`] when called twice.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;
    tracing_subscriber::registry()
        .with(config.layer().with_filter(filter))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        let config = TracingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.source_location);
        assert_eq!(config, TracingConfig::for_cli(false));
    }

    #[test]
    fn debug_adds_location() {
        let config = TracingConfig::for_cli(true);
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.source_location);
    }

    #[test]
    fn directive_names_every_crate() {
        let directive = TracingConfig::default().with_level(Level::INFO).default_directive();
        assert_eq!(
            directive,
            "syllacal=INFO,syllacal_cli=INFO,syllacal_core=INFO,syllacal_ics=INFO"
        );
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn explicit_directive_is_validated() {
        let ok = TracingConfig::default().with_directive("syllacal_core=trace");
        assert!(ok.filter().is_ok());

        let bad = TracingConfig::default().with_directive("syllacal_core=loudest");
        assert!(matches!(bad.filter(), Err(TracingError::Filter(_))));
    }

    #[test]
    fn format_names() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        for format in LogFormat::ALL {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
        let err = "verbose".parse::<LogFormat>().unwrap_err();
        assert!(matches!(err, TracingError::UnknownFormat(ref name) if name == "verbose"));
    }

    #[test]
    fn every_format_builds_a_layer() {
        for format in LogFormat::ALL {
            let config = TracingConfig::default().with_format(format);
            let _layer = config.layer();
            let _timed = TracingConfig {
                timestamps: true,
                ..config
            }
            .layer();
        }
    }

    #[test]
    fn builder() {
        let config = TracingConfig::default()
            .with_level(Level::TRACE)
            .with_format(LogFormat::Json);
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directive, None);
    }
}
