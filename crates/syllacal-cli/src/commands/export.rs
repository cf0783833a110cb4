//! `syllacal export`: write the events to an iCalendar file.

use std::io::Write;
use std::path::Path;

use syllacal_core::{ExportFile, SessionError};
use syllacal_ics::{IcsEncoder, read_entries};
use tracing::{debug, info};

use super::Context;
use crate::cli::InputArgs;
use crate::error::{CliError, CliResult};

pub fn run(
    ctx: &Context,
    source: &InputArgs,
    output: Option<&Path>,
    verify: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let session = ctx.load_session(source)?;
    // DTSTAMP is the reference time.
    let encoder = IcsEncoder::new(ctx.now.and_utc());

    let mut outcome = Err(SessionError::EmptyExport);
    session.export(&encoder, |result| outcome = result);
    let file = outcome?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.config.export_path(&file.file_name));
    save(&file, &path)?;

    if verify {
        check(&file, session.events().len())?;
        debug!(path = %path.display(), "Export verified");
    }

    writeln!(
        out,
        "Wrote {} event(s) to {}",
        session.events().len(),
        path.display()
    )?;
    Ok(())
}

fn save(file: &ExportFile, path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &file.bytes)?;
    info!(path = %path.display(), content_type = %file.content_type, "Saved calendar");
    Ok(())
}

fn check(file: &ExportFile, expected: usize) -> CliResult<()> {
    let entries = read_entries(&file.bytes)?;
    if entries.len() != expected {
        return Err(CliError::Verify(format!(
            "expected {} event(s), read back {}",
            expected,
            entries.len()
        )));
    }
    Ok(())
}
