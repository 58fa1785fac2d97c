//! One tracker run: load, process, report.

use std::io::Write;
use std::path::Path;

use tracing::info;

use biathlon_core::{Pipeline, RaceConfig, RaceOutcome, StopSignal};

use crate::cli::Cli;
use crate::error::TrackerError;

fn require_file(path: &Path) -> Result<(), TrackerError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(TrackerError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

/// Run the tracker with `cli` and write the event log followed by the
/// standings to `out`.
///
/// Nothing is written unless both input files exist and the configuration
/// is valid.
///
/// # Errors
///
/// Returns [`TrackerError`] if an input is missing or unreadable, the
/// configuration is invalid, dispatch fails, or `out` cannot be written.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<RaceOutcome, TrackerError> {
    require_file(&cli.config)?;
    require_file(&cli.events)?;

    let config = RaceConfig::load(&cli.config)?;
    info!(
        laps = config.laps,
        lap_len = config.lap_len,
        penalty_len = config.penalty_len,
        firing_lines = config.firing_lines,
        start = %config.start,
        start_delta_ms = config.start_delta.num_milliseconds(),
        "Configuration loaded"
    );

    let events = biathlon_events::load_events(&cli.events)?;
    info!(events = events.len(), path = %cli.events.display(), "Event log loaded");

    let stop = cli.deadline().map_or_else(StopSignal::new, StopSignal::with_deadline);
    let outcome = Pipeline::new(config)
        .with_mode(cli.mode())
        .with_stop_signal(stop)
        .run(events)
        .await?;

    biathlon_report::write_log(out, &outcome.events)?;
    biathlon_report::write_standings(out, &outcome.competitors)?;
    out.flush()?;

    Ok(outcome)
}
