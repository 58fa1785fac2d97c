//! Biathlon race tracker binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing, to stderr)
//! 2. Parse command-line arguments
//! 3. Check that the config and event files exist
//! 4. Load and validate the race configuration
//! 5. Load the event log, skipping malformed lines
//! 6. Run gap-fill and dispatch
//! 7. Write the event log and the final standings to stdout

use std::io::{self, BufWriter};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use biathlon_tracker::Cli;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if an input is missing, the configuration is invalid,
/// or the report cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    info!(
        config = %cli.config.display(),
        events = %cli.events.display(),
        parallel = cli.parallel,
        "biathlon-tracker starting"
    );

    let mut out = BufWriter::new(io::stdout());
    match biathlon_tracker::run(&cli, &mut out).await {
        Ok(outcome) => {
            info!(
                competitors = outcome.competitors.len(),
                events = outcome.events.len(),
                stopped = outcome.stopped,
                "Report written"
            );
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "biathlon-tracker failed");
            Err(err.into())
        }
    }
}
