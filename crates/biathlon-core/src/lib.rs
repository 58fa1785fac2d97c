//! Competitor state machine and race processing for the biathlon tracker.
//!
//! This crate turns a stream of race events into final competitor states.
//! It performs no I/O besides reading the configuration file.
//!
//! # Modules
//!
//! - [`config`] -- Race configuration loading, overrides, and validation
//! - [`transition`] -- Per-kind state transitions for one competitor
//! - [`dispatch`] -- Sequential and per-competitor parallel dispatch
//! - [`gap_fill`] -- Missed-shot inference for lost competitors
//! - [`standings`] -- Final standings order
//! - [`stop`] -- Cooperative cancellation
//! - [`pipeline`] -- Stage sequencing for a full run

pub mod config;
pub mod dispatch;
pub mod gap_fill;
pub mod pipeline;
pub mod standings;
pub mod stop;
pub mod transition;

pub use config::{ConfigError, MAX_LAPS, RaceConfig, RaceSettings};
pub use dispatch::{Dispatch, DispatchError, dispatch, dispatch_parallel};
pub use gap_fill::{GapFill, infer_missed_shots};
pub use pipeline::{DispatchMode, Pipeline, RaceOutcome};
pub use standings::standings;
pub use stop::StopSignal;
pub use transition::apply_event;
