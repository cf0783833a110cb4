//! `syllacal upcoming`: the next few events.

use std::io::Write;

use super::Context;
use crate::cli::InputArgs;
use crate::error::CliResult;

pub fn run(
    ctx: &Context,
    source: &InputArgs,
    limit: Option<usize>,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let session = ctx.load_session(source)?;
    let limit = limit.unwrap_or(ctx.config.display.upcoming_limit);
    let upcoming = session.upcoming(ctx.now, limit);
    let formatter = ctx.formatter();

    if json {
        let output = formatter.format_json_at(session.events().chronological(), upcoming, ctx.now);
        writeln!(out, "{}", serde_json::to_string_pretty(&output.upcoming)?)?;
        return Ok(());
    }

    if upcoming.is_empty() {
        writeln!(out, "No upcoming events.")?;
        return Ok(());
    }
    for line in formatter.format_tty_at(upcoming, ctx.now) {
        writeln!(out, "{}", line.text)?;
    }
    Ok(())
}
