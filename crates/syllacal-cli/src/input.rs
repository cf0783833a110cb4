//! Reading syllabus text.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::CliResult;

/// Reads the syllabus from `path`, or stdin when `path` is `None` or `-`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            let bytes = std::fs::read(path)?;
            debug!(path = %path.display(), bytes = bytes.len(), "Read syllabus file");
            Ok(decode(&bytes))
        }
        _ => read_from(std::io::stdin().lock()),
    }
}

/// Reads all of `reader` as syllabus text.
pub fn read_from(mut reader: impl Read) -> CliResult<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!(bytes = bytes.len(), "Read syllabus from stream");
    Ok(decode(&bytes))
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
