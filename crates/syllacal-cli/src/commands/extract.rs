//! `syllacal extract`: list every event found in a syllabus.

use std::io::Write;

use tracing::debug;

use super::Context;
use crate::cli::{InputArgs, ManualEvent};
use crate::error::CliResult;

pub fn run(
    ctx: &Context,
    source: &InputArgs,
    json: bool,
    manual: &[ManualEvent],
    out: &mut dyn Write,
) -> CliResult<()> {
    let mut session = ctx.load_session(source)?;
    for event in manual {
        session.insert_selection(&event.title, event.start, event.end)?;
        debug!(title = %event.title, "Added event from command line");
    }

    let formatter = ctx.formatter();
    let events = session.events().chronological();

    if json {
        let upcoming = session.upcoming(ctx.now, ctx.config.display.upcoming_limit);
        let output = formatter.format_json_at(events, upcoming, ctx.now);
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    if events.is_empty() {
        writeln!(out, "No dates found.")?;
        return Ok(());
    }

    writeln!(out, "Found {} event(s):", events.len())?;
    for line in formatter.format_tty_at(events, ctx.now) {
        writeln!(out, "{}", line.text)?;
    }
    writeln!(
        out,
        "Calendar opens on {}",
        session.anchor().format("%a %b %d %Y")
    )?;

    let upcoming = session.upcoming(ctx.now, ctx.config.display.upcoming_limit);
    if !upcoming.is_empty() {
        writeln!(out, "Upcoming:")?;
        for line in formatter.format_tty_at(upcoming, ctx.now) {
            writeln!(out, "{}", line.text)?;
        }
    }
    Ok(())
}
