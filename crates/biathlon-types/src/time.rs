//! Time-of-day and duration helpers.
//!
//! Event timestamps carry no date, so every instant is a
//! [`NaiveTime`] and every interval is a [`TimeDelta`]. All derivations use
//! checked arithmetic; out-of-range values clamp rather than wrap.

use chrono::{NaiveTime, TimeDelta};

/// Format accepted for timestamps and durations: `HH:MM:SS` with an
/// optional fractional part.
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Format used when rendering instants in the log and report.
const DISPLAY_FORMAT: &str = "%H:%M:%S%.3f";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;

/// Errors raised when a time string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// The input does not match `HH:MM:SS[.fff]`.
    #[error("invalid time '{input}': {source}")]
    Invalid {
        /// The text that failed to parse.
        input: String,
        /// The underlying chrono parse error.
        source: chrono::ParseError,
    },
}

/// Parse a time of day such as `09:30:01.005` or `10:00:00`.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, TimeParseError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|source| TimeParseError::Invalid {
        input: trimmed.to_owned(),
        source,
    })
}

/// Parse an interval written as a clock reading, e.g. `00:01:30`.
pub fn parse_duration(input: &str) -> Result<TimeDelta, TimeParseError> {
    let reading = parse_time_of_day(input)?;
    Ok(reading.signed_duration_since(NaiveTime::default()))
}

/// Render an instant as `HH:MM:SS.mmm`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

/// Render an interval as `HH:MM:SS.mmm`. Negative intervals render as zero.
pub fn format_duration(delta: TimeDelta) -> String {
    let total_ms = delta.num_milliseconds().max(0);
    let hours = total_ms.checked_div(MS_PER_HOUR).unwrap_or(0);
    let minutes = total_ms
        .checked_rem(MS_PER_HOUR)
        .and_then(|rest| rest.checked_div(MS_PER_MINUTE))
        .unwrap_or(0);
    let seconds = total_ms
        .checked_rem(MS_PER_MINUTE)
        .and_then(|rest| rest.checked_div(MS_PER_SECOND))
        .unwrap_or(0);
    let millis = total_ms.checked_rem(MS_PER_SECOND).unwrap_or(0);
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Seconds in `delta` as a float, or `None` when the interval is not positive.
pub fn positive_seconds(delta: TimeDelta) -> Option<f64> {
    delta
        .to_std()
        .ok()
        .map(|d| d.as_secs_f64())
        .filter(|secs| *secs > 0.0)
}
