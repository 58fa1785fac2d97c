//! Per-kind state transitions for a single competitor.
//!
//! [`apply_event`] is the only place where competitor state changes. Each
//! event kind has its own handler; handlers never fail. Malformed parameters
//! degrade to zero and are logged at debug level.
//!
//! Two transitions synthesize a follow-up event at the same instant:
//! - a start later than `scheduled + start_delta` disqualifies (kind 32)
//! - the final end-of-lap finishes the race (kind 33)
//!
//! Once a competitor is terminal (finished, not finished, disqualified)
//! every handler is a no-op.

use chrono::NaiveTime;
use tracing::debug;

use biathlon_types::{
    Competitor, CompetitorStatus, Event, EventKind, LapRecord, MISS_TARGET, Segment,
    parse_time_of_day,
};

use crate::config::RaceConfig;

/// Apply one event to its competitor.
///
/// Returns the synthesized event, if the transition produced one. The
/// returned event is already consumed and carries the triggering instant.
pub fn apply_event(
    competitor: &mut Competitor,
    event: &Event,
    config: &RaceConfig,
) -> Option<Event> {
    if competitor.is_terminal() {
        debug!(
            competitor = %competitor.id,
            kind = event.kind.code(),
            status = %competitor.status,
            "ignoring event for terminal competitor"
        );
        return None;
    }

    match event.kind {
        EventKind::Registration => {
            competitor.registered_at = Some(event.time);
            None
        }
        EventKind::SetStartTime => {
            set_start_time(competitor, event);
            None
        }
        EventKind::OnStartLine | EventKind::Disqualified | EventKind::Finished => None,
        EventKind::Started => start(competitor, event.time, config),
        EventKind::OnFiringRange => {
            competitor.on_firing_range = true;
            competitor.firing_line = parse_number(event, "firing line");
            None
        }
        EventKind::Shot => {
            shoot(competitor, event);
            None
        }
        EventKind::LeftFiringRange => {
            competitor.on_firing_range = false;
            None
        }
        EventKind::EnteredPenalty => {
            competitor.in_penalty = true;
            competitor.penalty.started_at = Some(event.time);
            None
        }
        EventKind::LeftPenalty => {
            leave_penalty(competitor, event.time, config);
            None
        }
        EventKind::LapCompleted => complete_lap(competitor, event.time, config),
        EventKind::Abandoned => {
            competitor.status = CompetitorStatus::NotFinished;
            competitor.comment = event.parameter.clone();
            None
        }
    }
}

fn set_start_time(competitor: &mut Competitor, event: &Event) {
    match parse_time_of_day(event.parameter_str()) {
        Ok(scheduled) => competitor.scheduled_start = Some(scheduled),
        Err(err) => debug!(
            competitor = %competitor.id,
            error = %err,
            "ignoring unparseable start time"
        ),
    }
}

fn start(competitor: &mut Competitor, now: NaiveTime, config: &RaceConfig) -> Option<Event> {
    competitor.actual_start = Some(now);
    competitor.status = CompetitorStatus::Running;

    // No draw means the scheduled start is midnight.
    let scheduled = competitor.scheduled_start.unwrap_or_default();
    let delay = now.signed_duration_since(scheduled);
    if delay > config.start_delta {
        debug!(
            competitor = %competitor.id,
            delay_ms = delay.num_milliseconds(),
            "late start, disqualifying"
        );
        competitor.status = CompetitorStatus::Disqualified;
        return Some(Event::synthesized(now, EventKind::Disqualified, competitor.id));
    }
    None
}

fn shoot(competitor: &mut Competitor, event: &Event) {
    let target = parse_number(event, "target");
    competitor.total_shots = competitor.total_shots.saturating_add(1);
    if target == MISS_TARGET {
        competitor.last_shot_missed = true;
    } else {
        competitor.shots_hit = competitor.shots_hit.saturating_add(1);
        competitor.last_shot_missed = false;
    }
}

fn leave_penalty(competitor: &mut Competitor, now: NaiveTime, config: &RaceConfig) {
    competitor.in_penalty = false;
    if !competitor.is_running() {
        return;
    }
    if let Some(entered) = competitor.penalty.started_at {
        let elapsed = now.signed_duration_since(entered);
        competitor.penalty.result = Some(Segment::measure(config.penalty_len, elapsed));
    }
}

fn complete_lap(competitor: &mut Competitor, now: NaiveTime, config: &RaceConfig) -> Option<Event> {
    if !competitor.is_running() {
        return None;
    }

    let lap = competitor.current_lap;
    let slot = lap
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())?;

    // Lap 1 is timed from the start, later laps from the previous finish.
    let previous_finish = slot
        .checked_sub(1)
        .and_then(|prev| competitor.laps.get(prev))
        .copied()
        .flatten()
        .map(|record| record.finished_at);
    let from = previous_finish.or(competitor.actual_start).unwrap_or(now);

    let record = LapRecord {
        segment: Segment::measure(config.lap_len, now.signed_duration_since(from)),
        finished_at: now,
    };
    if let Some(cell) = competitor.laps.get_mut(slot) {
        *cell = Some(record);
    }
    competitor.current_lap = lap.saturating_add(1);

    if competitor.current_lap > config.laps {
        competitor.status = CompetitorStatus::Finished;
        return Some(Event::synthesized(now, EventKind::Finished, competitor.id));
    }
    None
}

fn parse_number(event: &Event, what: &'static str) -> u32 {
    let raw = event.parameter_str().trim();
    raw.parse().unwrap_or_else(|_| {
        debug!(
            competitor = %event.competitor_id,
            field = what,
            value = raw,
            "unparseable numeric parameter, using 0"
        );
        0
    })
}
