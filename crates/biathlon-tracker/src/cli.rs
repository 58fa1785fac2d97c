//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use biathlon_core::DispatchMode;

/// Default race configuration path.
pub const DEFAULT_CONFIG: &str = "config.json";

/// Default event log path.
pub const DEFAULT_EVENTS: &str = "events.txt";

/// Process a biathlon event log into a race log and final standings.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "biathlon-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the race configuration (JSON, or YAML by extension)
    #[arg(long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Path to the event log
    #[arg(long, default_value = DEFAULT_EVENTS)]
    pub events: PathBuf,

    /// Process each competitor in its own task
    #[arg(long)]
    pub parallel: bool,

    /// Stop processing after this many milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

impl Cli {
    /// Dispatch mode selected by `--parallel`.
    pub const fn mode(&self) -> DispatchMode {
        if self.parallel {
            DispatchMode::Parallel
        } else {
            DispatchMode::Sequential
        }
    }

    /// Processing deadline selected by `--deadline-ms`.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
