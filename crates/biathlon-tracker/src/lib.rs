//! Wiring for the `biathlon-tracker` binary.
//!
//! Kept as a library so the whole run can be driven from tests with an
//! in-memory output sink.

pub mod app;
pub mod cli;
pub mod error;

pub use app::run;
pub use cli::Cli;
pub use error::TrackerError;
