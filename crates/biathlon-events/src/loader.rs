//! Loading a whole event log.
//!
//! Blank lines are ignored. Lines that fail to parse are skipped with a
//! warning naming the line number, so one bad line never loses the race.

use std::path::Path;

use tracing::{debug, warn};

use biathlon_types::Event;

use crate::error::LoadError;
use crate::parser::parse_line;

/// Parse every line of `text`, skipping blank and malformed lines.
pub fn parse_events(text: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!(
                    line_number = index.saturating_add(1),
                    line,
                    error = %err,
                    "skipping invalid event line"
                );
                skipped = skipped.saturating_add(1);
            }
        }
    }

    debug!(loaded = events.len(), skipped, "event log parsed");
    events
}

/// Read and parse an event log file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read.
pub fn load_events(path: &Path) -> Result<Vec<Event>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_events(&text))
}
