//! syllacal CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use syllacal_cli::cli::{Cli, Command, ConfigAction};
use syllacal_cli::commands::{self, Context};
use syllacal_cli::config::Config;
use syllacal_cli::error::{CliError, CliResult};
use syllacal_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = TracingConfig::for_cli(cli.debug).with_format(cli.log_format);
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if cli.config.is_some() {
        Config::load_from(&config_path).map_err(CliError::Config)?
    } else {
        Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable configuration");
            Config::default()
        })
    };

    let now = cli
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let ctx = Context::new(config, now);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Extract { source, json, add } => {
            commands::extract::run(&ctx, &source, json, &add, &mut out)
        }
        Command::Upcoming {
            source,
            limit,
            json,
        } => commands::upcoming::run(&ctx, &source, limit, json, &mut out),
        Command::Export {
            source,
            output,
            verify,
        } => commands::export::run(&ctx, &source, output.as_deref(), verify, &mut out),
        Command::Notify { source, dry_run } => {
            commands::notify::run(&ctx, &source, dry_run, &mut out)
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&ctx.config, &config_path, &mut out),
            ConfigAction::Validate => commands::config::validate(&ctx.config, &mut out),
            ConfigAction::Path => commands::config::path(&config_path, &mut out),
        },
    }?;

    out.flush()?;
    Ok(())
}
