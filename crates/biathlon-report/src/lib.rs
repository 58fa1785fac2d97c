//! Text rendering for the biathlon race tracker.
//!
//! Presentation only: the event log and the final standings table are
//! written to any [`std::io::Write`] sink. Ordering decisions come from
//! `biathlon-core`.

pub mod log;
pub mod standings;

pub use log::{describe, write_log};
pub use standings::{REPORT_RULE, REPORT_TITLE, standing_line, write_standings};
