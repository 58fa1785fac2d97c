//! Stage sequencing for a race run.
//!
//! [`Pipeline::run`] takes the loaded events through the inference pass and
//! then dispatch, each stage consuming and producing an owned sequence:
//!
//! 1. [`infer_missed_shots`] back-fills misses for lost competitors
//! 2. [`dispatch`] or [`dispatch_parallel`] applies every event
//!
//! [`infer_missed_shots`]: crate::gap_fill::infer_missed_shots
//! [`dispatch`]: crate::dispatch::dispatch
//! [`dispatch_parallel`]: crate::dispatch::dispatch_parallel

use std::collections::BTreeMap;

use tracing::{info, warn};

use biathlon_types::{Competitor, CompetitorId, Event};

use crate::config::RaceConfig;
use crate::dispatch::{self, DispatchError};
use crate::gap_fill;
use crate::stop::StopSignal;

/// How the dispatch stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// One pass on the calling task.
    #[default]
    Sequential,
    /// One tokio task per competitor.
    Parallel,
}

/// Everything a race run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceOutcome {
    /// Final event log, in time order, synthesized events included.
    pub events: Vec<Event>,
    /// Final state of every competitor.
    pub competitors: BTreeMap<CompetitorId, Competitor>,
    /// Shots inferred by the gap-fill pass.
    pub inferred: usize,
    /// Events synthesized during dispatch.
    pub synthesized: usize,
    /// Whether dispatch was cut short by the stop signal.
    pub stopped: bool,
}

/// Runs the race stages with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RaceConfig,
    mode: DispatchMode,
    stop: StopSignal,
}

impl Pipeline {
    /// Create a sequential pipeline with a stop signal that never trips.
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            mode: DispatchMode::Sequential,
            stop: StopSignal::new(),
        }
    }

    /// Select the dispatch mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach a stop signal.
    #[must_use]
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// The configuration this pipeline runs with.
    pub const fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Run gap-fill then dispatch over `events`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if a parallel competitor task fails.
    pub async fn run(&self, events: Vec<Event>) -> Result<RaceOutcome, DispatchError> {
        let loaded = events.len();
        let filled = gap_fill::infer_missed_shots(events);

        let result = match self.mode {
            DispatchMode::Sequential => dispatch::dispatch(filled.events, &self.config, &self.stop),
            DispatchMode::Parallel => {
                dispatch::dispatch_parallel(filled.events, &self.config, &self.stop).await?
            }
        };

        info!(
            mode = ?self.mode,
            loaded,
            inferred = filled.inferred,
            synthesized = result.synthesized,
            competitors = result.competitors.len(),
            "Race processed"
        );
        if result.stopped {
            warn!("Race processing was stopped before all events were applied");
        }

        Ok(RaceOutcome {
            events: result.events,
            competitors: result.competitors,
            inferred: filled.inferred,
            synthesized: result.synthesized,
            stopped: result.stopped,
        })
    }
}
