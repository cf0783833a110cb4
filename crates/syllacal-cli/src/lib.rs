//! CLI, configuration, commands, desktop notifications
//!
//! This crate provides the `syllacal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod notify;

pub use cli::Cli;
pub use error::{CliError, CliResult};
