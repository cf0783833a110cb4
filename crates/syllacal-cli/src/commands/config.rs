//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Dump the current configuration.
pub fn dump(config: &Config, path: &Path, out: &mut dyn Write) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    writeln!(out, "# config.toml ({})", path.display())?;
    writeln!(out, "{}", toml_str)?;
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &Config, out: &mut dyn Write) -> CliResult<()> {
    config.validate().map_err(CliError::Config)?;
    writeln!(out, "Configuration is valid.")?;
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path, out: &mut dyn Write) -> CliResult<()> {
    writeln!(out, "config: {}", path.display())?;
    Ok(())
}
