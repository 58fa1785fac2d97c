//! Error types for the tracker binary.
//!
//! [`TrackerError`] wraps every failure that stops a run before the report
//! is written.

use std::path::PathBuf;

/// Top-level error for the tracker binary.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// An input file does not exist.
    #[error("file {} not found", .path.display())]
    MissingFile {
        /// The path that was checked.
        path: PathBuf,
    },

    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: biathlon_core::ConfigError,
    },

    /// Reading the event log failed.
    #[error("event log error: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: biathlon_events::LoadError,
    },

    /// Parallel dispatch failed.
    #[error("dispatch error: {source}")]
    Dispatch {
        /// The underlying dispatch error.
        #[from]
        source: biathlon_core::DispatchError,
    },

    /// Writing the report failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
