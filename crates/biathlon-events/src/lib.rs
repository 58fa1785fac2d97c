//! Event log ingestion for the biathlon race tracker.
//!
//! Turns the raw text log into [`Event`](biathlon_types::Event) records.
//! Ordering is left to dispatch; the loader keeps file order.
//!
//! # Modules
//!
//! - [`parser`] -- Single-line parsing
//! - [`loader`] -- Whole-file loading with per-line recovery
//! - [`error`] -- Parse and load errors

pub mod error;
pub mod loader;
pub mod parser;

pub use error::{LoadError, ParseError};
pub use loader::{load_events, parse_events};
pub use parser::parse_line;
