//! Per-competitor race state.
//!
//! A [`Competitor`] is created lazily the first time an event mentions its
//! id and is then mutated only by the state machine in `biathlon-core`.
//! This module owns the record and the read-only facts derived from it.

use chrono::{NaiveTime, TimeDelta};

use crate::ids::CompetitorId;
use crate::time::positive_seconds;

/// Race status of a competitor.
///
/// `Finished`, `NotFinished`, and `Disqualified` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompetitorStatus {
    /// Registered or scheduled but not yet off the start line.
    #[default]
    NotStarted,
    /// On the course.
    Running,
    /// Completed every configured lap.
    Finished,
    /// Abandoned the race.
    NotFinished,
    /// Started outside the allowed window.
    Disqualified,
}

impl CompetitorStatus {
    /// Whether no later event may change this competitor.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::NotFinished | Self::Disqualified)
    }
}

impl core::fmt::Display for CompetitorStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Finished => "Finished",
            Self::NotFinished => "NotFinished",
            Self::Disqualified => "Disqualified",
        };
        f.write_str(label)
    }
}

/// Average speed in metres per second over `length_m` metres.
///
/// Returns `0.0` when `elapsed` is zero or negative.
pub fn average_speed(length_m: u32, elapsed: TimeDelta) -> f64 {
    positive_seconds(elapsed).map_or(0.0, |secs| f64::from(length_m) / secs)
}

/// A timed stretch of course with its average speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Time spent on the stretch.
    pub elapsed: TimeDelta,
    /// Average speed in metres per second.
    pub speed: f64,
}

impl Segment {
    /// Measure a stretch of `length_m` metres covered in `elapsed`.
    pub fn measure(length_m: u32, elapsed: TimeDelta) -> Self {
        Self {
            elapsed,
            speed: average_speed(length_m, elapsed),
        }
    }

    /// Whether any time was recorded on the stretch.
    pub fn is_timed(&self) -> bool {
        self.elapsed > TimeDelta::zero()
    }
}

/// One completed main lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapRecord {
    /// Lap split and speed.
    pub segment: Segment,
    /// Instant the lap ended. The next lap is timed from here.
    pub finished_at: NaiveTime,
}

/// The competitor's penalty-loop record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PenaltyLoop {
    /// Instant the competitor last entered the loop.
    pub started_at: Option<NaiveTime>,
    /// Timing of the most recently completed loop.
    pub result: Option<Segment>,
}

/// Derived race state of one competitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    /// Bib number.
    pub id: CompetitorId,
    /// When the competitor registered.
    pub registered_at: Option<NaiveTime>,
    /// Start time assigned by the draw.
    pub scheduled_start: Option<NaiveTime>,
    /// When the competitor actually left the start line.
    pub actual_start: Option<NaiveTime>,
    /// Current race status.
    pub status: CompetitorStatus,
    /// Free-text comment attached on abandonment.
    pub comment: Option<String>,
    /// 1-based index of the lap in progress. `laps + 1` once finished.
    pub current_lap: u32,
    /// Firing line announced on the latest range entry.
    pub firing_line: u32,
    /// Shots that hit a target.
    pub shots_hit: u32,
    /// All shots taken.
    pub total_shots: u32,
    /// Whether the competitor is currently on a firing range.
    pub on_firing_range: bool,
    /// Whether the competitor is currently in the penalty loop.
    pub in_penalty: bool,
    /// Whether the most recent shot was a miss.
    pub last_shot_missed: bool,
    /// One slot per configured lap; `None` until that lap is completed.
    pub laps: Vec<Option<LapRecord>>,
    /// Penalty-loop timing.
    pub penalty: PenaltyLoop,
}

impl Competitor {
    /// Create a fresh, not-started competitor with `lap_count` empty lap slots.
    pub fn new(id: CompetitorId, lap_count: usize) -> Self {
        Self {
            id,
            registered_at: None,
            scheduled_start: None,
            actual_start: None,
            status: CompetitorStatus::NotStarted,
            comment: None,
            current_lap: 1,
            firing_line: 0,
            shots_hit: 0,
            total_shots: 0,
            on_firing_range: false,
            in_penalty: false,
            last_shot_missed: false,
            laps: vec![None; lap_count],
            penalty: PenaltyLoop::default(),
        }
    }

    /// Sum of all completed lap splits.
    pub fn total_time(&self) -> TimeDelta {
        self.laps
            .iter()
            .flatten()
            .fold(TimeDelta::zero(), |acc, lap| {
                acc.checked_add(&lap.segment.elapsed).unwrap_or(acc)
            })
    }

    /// Shots that missed.
    pub const fn shots_missed(&self) -> u32 {
        self.total_shots.saturating_sub(self.shots_hit)
    }

    /// Number of lap slots that hold a completed lap.
    pub fn completed_laps(&self) -> usize {
        self.laps.iter().flatten().count()
    }

    /// Whether the competitor has reached a terminal status.
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the competitor is on the course.
    pub const fn is_running(&self) -> bool {
        matches!(self.status, CompetitorStatus::Running)
    }

    /// Whether the competitor completed the race.
    pub const fn is_finished(&self) -> bool {
        matches!(self.status, CompetitorStatus::Finished)
    }

    /// Shooting record as `hits/total`.
    pub fn accuracy(&self) -> String {
        format!("{}/{}", self.shots_hit, self.total_shots)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn lap(secs: i64, finished_at: NaiveTime) -> LapRecord {
        LapRecord {
            segment: Segment::measure(3_651, TimeDelta::seconds(secs)),
            finished_at,
        }
    }

    #[test]
    fn new_competitor_is_not_started_with_empty_slots() {
        let c = Competitor::new(CompetitorId(1), 3);
        assert_eq!(c.status, CompetitorStatus::NotStarted);
        assert_eq!(c.current_lap, 1);
        assert_eq!(c.laps.len(), 3);
        assert!(c.laps.iter().all(Option::is_none));
        assert_eq!(c.penalty, PenaltyLoop::default());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!CompetitorStatus::NotStarted.is_terminal());
        assert!(!CompetitorStatus::Running.is_terminal());
        assert!(CompetitorStatus::Finished.is_terminal());
        assert!(CompetitorStatus::NotFinished.is_terminal());
        assert!(CompetitorStatus::Disqualified.is_terminal());
    }

    #[test]
    fn total_time_sums_completed_laps_only() {
        let mut c = Competitor::new(CompetitorId(1), 3);
        c.laps = vec![
            Some(lap(600, at(10, 10, 0))),
            Some(lap(650, at(10, 20, 50))),
            None,
        ];
        assert_eq!(c.total_time(), TimeDelta::seconds(1_250));
        assert_eq!(c.completed_laps(), 2);
    }

    #[test]
    fn missed_shots_never_underflow() {
        let mut c = Competitor::new(CompetitorId(1), 1);
        c.total_shots = 5;
        c.shots_hit = 4;
        assert_eq!(c.shots_missed(), 1);
        assert_eq!(c.accuracy(), "4/5");
        c.shots_hit = 6;
        assert_eq!(c.shots_missed(), 0);
    }

    #[test]
    fn speed_is_zero_for_non_positive_elapsed() {
        assert!(average_speed(150, TimeDelta::zero()).abs() < f64::EPSILON);
        assert!(average_speed(150, TimeDelta::seconds(-3)).abs() < f64::EPSILON);
        let speed = average_speed(150, TimeDelta::seconds(60));
        assert!((speed - 2.5).abs() < 1e-9);
    }

    #[test]
    fn status_labels() {
        assert_eq!(CompetitorStatus::NotFinished.to_string(), "NotFinished");
        assert_eq!(CompetitorStatus::Disqualified.to_string(), "Disqualified");
    }
}
