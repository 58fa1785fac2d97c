//! Shared type definitions for the biathlon race tracker.
//!
//! This crate is the single source of truth for the data that flows between
//! the event loader, the competitor state machine, and the report renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe competitor identifier
//! - [`event`] -- Event kinds and the immutable [`Event`] record
//! - [`competitor`] -- Per-competitor derived race state
//! - [`time`] -- Time-of-day and duration parsing/formatting

pub mod competitor;
pub mod event;
pub mod ids;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use competitor::{
    Competitor, CompetitorStatus, LapRecord, PenaltyLoop, Segment, average_speed,
};
pub use event::{
    Event, EventKind, LOST_IN_FOREST, MISS_TARGET, MISS_TARGET_TEXT, UnknownEventKind,
};
pub use ids::CompetitorId;
pub use time::{
    TimeParseError, format_duration, format_time_of_day, parse_duration, parse_time_of_day,
    positive_seconds,
};
