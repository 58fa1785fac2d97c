//! Error types for event loading.
//!
//! [`ParseError`] describes a single bad line and is recoverable: the loader
//! logs it and moves on. [`LoadError`] is fatal for the whole file.

use biathlon_types::{TimeParseError, UnknownEventKind};

/// Why one event line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `[...]` timestamp bracket was found.
    #[error("missing [HH:MM:SS.mmm] timestamp")]
    MissingTimestamp,

    /// The bracketed timestamp is not a valid time of day.
    #[error("invalid timestamp: {source}")]
    InvalidTime {
        /// The underlying time parse error.
        #[from]
        source: TimeParseError,
    },

    /// The kind code or competitor id is missing.
    #[error("expected '<kind> <competitor>' after the timestamp")]
    MissingFields,

    /// The kind code is not a number.
    #[error("invalid event kind '{token}'")]
    InvalidKind {
        /// The offending token.
        token: String,
    },

    /// The kind code is a number outside the protocol.
    #[error("{source}")]
    UnknownKind {
        /// The rejected code.
        #[from]
        source: UnknownEventKind,
    },

    /// The competitor id is not a non-negative integer.
    #[error("invalid competitor id '{token}'")]
    InvalidCompetitorId {
        /// The offending token.
        token: String,
    },
}

/// Errors that abort loading an event file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read the events file from disk.
    #[error("failed to read events file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
