//! Missed-shot inference for competitors lost on the course.
//!
//! A competitor who abandons with a "Lost in the forest" comment often has
//! an incomplete shooting record. When fewer than five shots are logged and
//! none of them is the raw miss sentinel, one miss is inferred five seconds
//! before the abandonment.

use chrono::{NaiveTime, TimeDelta};
use tracing::debug;

use biathlon_types::{CompetitorId, Event, EventKind, LOST_IN_FOREST, MISS_TARGET_TEXT};

/// Shots in a complete firing-range visit.
const FULL_SHOT_COUNT: usize = 5;

/// How long before the abandonment the inferred miss is placed.
const INFERRED_SHOT_LEAD_SECS: i64 = 5;

/// Result of the gap-fill pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapFill {
    /// Input events followed by any inferred shots.
    pub events: Vec<Event>,
    /// Number of shots inferred.
    pub inferred: usize,
}

/// Append an inferred missed shot for every lost competitor whose shooting
/// record is incomplete.
///
/// Inferred events are unconsumed so that dispatch applies them. Shot counts
/// include shots inferred earlier in the same pass.
pub fn infer_missed_shots(mut events: Vec<Event>) -> GapFill {
    let loaded_len = events.len();
    let mut inferred = 0usize;

    for index in 0..loaded_len {
        let Some(trigger) = events.get(index) else {
            break;
        };
        if trigger.kind != EventKind::Abandoned || !trigger.parameter_str().contains(LOST_IN_FOREST) {
            continue;
        }
        let competitor = trigger.competitor_id;
        let abandoned_at = trigger.time;

        let (shots, has_raw_miss) = shot_record(&events, competitor);
        if shots >= FULL_SHOT_COUNT || has_raw_miss {
            continue;
        }

        let (time, day_shift) =
            abandoned_at.overflowing_sub_signed(TimeDelta::seconds(INFERRED_SHOT_LEAD_SECS));
        // Saturate at midnight instead of wrapping to the previous evening.
        let time = if day_shift == 0 { time } else { NaiveTime::default() };

        debug!(
            competitor = %competitor,
            logged_shots = shots,
            "inferring missed shot for lost competitor"
        );
        events.push(Event::new(time, EventKind::Shot, competitor).with_parameter(MISS_TARGET_TEXT));
        inferred = inferred.saturating_add(1);
    }

    GapFill { events, inferred }
}

/// Count a competitor's shots and whether any used the raw miss sentinel.
fn shot_record(events: &[Event], competitor: CompetitorId) -> (usize, bool) {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Shot && e.competitor_id == competitor)
        .fold((0usize, false), |(count, miss), e| {
            (count.saturating_add(1), miss || e.parameter_str() == MISS_TARGET_TEXT)
        })
}
