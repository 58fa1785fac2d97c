//! Event dispatch: the driver of the competitor state machine.
//!
//! Dispatch sorts the event stream by time (stable, so ties keep input
//! order), routes every unconsumed event to [`apply_event`], and writes an
//! output stream in which each synthesized event directly precedes the
//! event that triggered it.
//!
//! Two modes produce identical results on the same input:
//!
//! - [`dispatch`] walks the stream on the calling thread.
//! - [`dispatch_parallel`] partitions the sorted stream by competitor and
//!   runs one task per competitor. Each task owns its competitor record;
//!   results meet in a shared map behind a single mutex. Output events are
//!   put back in global order by their position in the sorted stream.
//!
//! Both modes honour a [`StopSignal`]. When it trips, the state accumulated
//! so far is returned and the remaining events pass through unconsumed.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use biathlon_types::{Competitor, CompetitorId, Event};

use crate::config::RaceConfig;
use crate::stop::StopSignal;
use crate::transition::apply_event;

/// Errors from parallel dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A per-competitor task panicked or was cancelled.
    #[error("competitor task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Output of a dispatch run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    /// The sorted input with synthesized events spliced in.
    pub events: Vec<Event>,
    /// Final state of every competitor that received an event.
    pub competitors: BTreeMap<CompetitorId, Competitor>,
    /// Number of events synthesized by transitions.
    pub synthesized: usize,
    /// Whether the stop signal cut the run short.
    pub stopped: bool,
}

/// Sort events by time. Ties keep their input order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| event.time);
}

/// Dispatch every event on the calling thread.
pub fn dispatch(mut events: Vec<Event>, config: &RaceConfig, stop: &StopSignal) -> Dispatch {
    sort_events(&mut events);

    let mut result = Dispatch {
        events: Vec::with_capacity(events.len()),
        ..Dispatch::default()
    };
    let mut pending = events.into_iter();

    while let Some(mut event) = pending.next() {
        if stop.should_stop() {
            let remaining = pending.len().saturating_add(1);
            warn!(remaining, "dispatch stopped early, passing remaining events through");
            result.events.push(event);
            result.events.extend(pending);
            result.stopped = true;
            break;
        }
        if event.is_consumed() {
            result.events.push(event);
            continue;
        }

        event.mark_consumed();
        let competitor = result
            .competitors
            .entry(event.competitor_id)
            .or_insert_with(|| Competitor::new(event.competitor_id, config.lap_slots()));
        if let Some(synthesized) = apply_event(competitor, &event, config) {
            debug!(
                competitor = %synthesized.competitor_id,
                kind = synthesized.kind.code(),
                "synthesized event"
            );
            result.events.push(synthesized);
            result.synthesized = result.synthesized.saturating_add(1);
        }
        result.events.push(event);
    }

    result
}

/// Position of an output event: index in the sorted input, then 0 for a
/// synthesized event and 1 for the input event itself.
type Slot = (usize, u8);

const SYNTHESIZED_SLOT: u8 = 0;
const INPUT_SLOT: u8 = 1;

/// Dispatch with one task per competitor on the current tokio runtime.
///
/// # Errors
///
/// Returns [`DispatchError::Join`] if a competitor task panics.
pub async fn dispatch_parallel(
    mut events: Vec<Event>,
    config: &RaceConfig,
    stop: &StopSignal,
) -> Result<Dispatch, DispatchError> {
    sort_events(&mut events);
    let total = events.len();

    let mut output: Vec<(Slot, Event)> = Vec::with_capacity(total);
    let mut partitions: BTreeMap<CompetitorId, Vec<(usize, Event)>> = BTreeMap::new();
    for (index, event) in events.into_iter().enumerate() {
        if event.is_consumed() {
            output.push(((index, INPUT_SLOT), event));
        } else {
            partitions.entry(event.competitor_id).or_default().push((index, event));
        }
    }

    let config = Arc::new(config.clone());
    let shared: Arc<Mutex<BTreeMap<CompetitorId, Competitor>>> =
        Arc::new(Mutex::new(BTreeMap::new()));
    let mut workers: JoinSet<(Vec<(Slot, Event)>, usize)> = JoinSet::new();
    let mut stopped = false;

    for (id, owned) in partitions {
        if stopped || stop.should_stop() {
            if !stopped {
                warn!(competitor = %id, "dispatch stopped early, passing remaining events through");
            }
            stopped = true;
            output.extend(owned.into_iter().map(|(index, e)| ((index, INPUT_SLOT), e)));
            continue;
        }

        let config = Arc::clone(&config);
        let shared = Arc::clone(&shared);
        workers.spawn(async move {
            let (competitor, tagged, synthesized) = run_competitor(id, owned, &config);
            shared.lock().await.insert(id, competitor);
            (tagged, synthesized)
        });
    }

    let mut synthesized = 0usize;
    while let Some(joined) = workers.join_next().await {
        let (tagged, count) = joined?;
        output.extend(tagged);
        synthesized = synthesized.saturating_add(count);
    }

    output.sort_by_key(|(slot, _)| *slot);
    let competitors = std::mem::take(&mut *shared.lock().await);

    Ok(Dispatch {
        events: output.into_iter().map(|(_, event)| event).collect(),
        competitors,
        synthesized,
        stopped,
    })
}

/// Apply one competitor's events in order, tagging every output event with
/// its slot in the global stream.
fn run_competitor(
    id: CompetitorId,
    events: Vec<(usize, Event)>,
    config: &RaceConfig,
) -> (Competitor, Vec<(Slot, Event)>, usize) {
    let mut competitor = Competitor::new(id, config.lap_slots());
    let mut tagged = Vec::with_capacity(events.len());
    let mut synthesized = 0usize;

    for (index, mut event) in events {
        event.mark_consumed();
        if let Some(extra) = apply_event(&mut competitor, &event, config) {
            debug!(competitor = %id, kind = extra.kind.code(), "synthesized event");
            tagged.push(((index, SYNTHESIZED_SLOT), extra));
            synthesized = synthesized.saturating_add(1);
        }
        tagged.push(((index, INPUT_SLOT), event));
    }

    (competitor, tagged, synthesized)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveTime, TimeDelta};

    use biathlon_types::{CompetitorStatus, EventKind};

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn ev(time: NaiveTime, kind: EventKind, id: u32) -> Event {
        Event::new(time, kind, CompetitorId(id))
    }

    fn config() -> RaceConfig {
        RaceConfig {
            laps: 2,
            lap_len: 3_651,
            penalty_len: 50,
            firing_lines: 1,
            start: at(9, 30, 0),
            start_delta: TimeDelta::seconds(30),
        }
    }

    /// Two competitors: 1 finishes both laps, 2 starts late.
    fn race() -> Vec<Event> {
        vec![
            ev(at(10, 20, 0), EventKind::LapCompleted, 1),
            ev(at(9, 5, 0), EventKind::Registration, 1),
            ev(at(9, 6, 0), EventKind::Registration, 2),
            ev(at(9, 15, 0), EventKind::SetStartTime, 1).with_parameter("09:30:00.000"),
            ev(at(9, 15, 0), EventKind::SetStartTime, 2).with_parameter("09:31:00.000"),
            ev(at(9, 30, 0), EventKind::OnStartLine, 1),
            ev(at(9, 30, 1), EventKind::Started, 1),
            ev(at(9, 33, 0), EventKind::Started, 2),
            ev(at(9, 40, 0), EventKind::OnFiringRange, 1).with_parameter("1"),
            ev(at(9, 40, 5), EventKind::Shot, 1).with_parameter("1"),
            ev(at(9, 40, 7), EventKind::Shot, 1).with_parameter("3"),
            ev(at(9, 40, 9), EventKind::LeftFiringRange, 1),
            ev(at(9, 41, 0), EventKind::EnteredPenalty, 1),
            ev(at(9, 42, 0), EventKind::LeftPenalty, 1),
            ev(at(9, 55, 0), EventKind::LapCompleted, 1),
        ]
    }

    #[test]
    fn synthesized_events_precede_their_trigger() {
        let out = dispatch(race(), &config(), &StopSignal::new());
        assert_eq!(out.synthesized, 2);
        assert_eq!(out.events.len(), race().len().saturating_add(2));
        assert!(out.events.iter().all(Event::is_consumed));

        let kinds: Vec<(EventKind, CompetitorId)> =
            out.events.iter().map(|e| (e.kind, e.competitor_id)).collect();
        let dq = kinds
            .iter()
            .position(|k| *k == (EventKind::Disqualified, CompetitorId(2)))
            .unwrap();
        assert_eq!(kinds.get(dq.saturating_add(1)), Some(&(EventKind::Started, CompetitorId(2))));
        assert_eq!(kinds.get(kinds.len().saturating_sub(2)), Some(&(EventKind::Finished, CompetitorId(1))));
        assert_eq!(kinds.last(), Some(&(EventKind::LapCompleted, CompetitorId(1))));
    }

    #[test]
    fn output_is_time_ordered() {
        let out = dispatch(race(), &config(), &StopSignal::new());
        assert!(out.events.windows(2).all(|w| match w {
            [a, b] => a.time <= b.time,
            _ => true,
        }));
    }

    #[test]
    fn final_states() {
        let out = dispatch(race(), &config(), &StopSignal::new());
        let one = out.competitors.get(&CompetitorId(1)).unwrap();
        assert_eq!(one.status, CompetitorStatus::Finished);
        assert_eq!(one.current_lap, 3);
        assert_eq!((one.shots_hit, one.total_shots), (1, 2));
        assert_eq!(one.penalty.result.unwrap().elapsed, TimeDelta::minutes(1));
        let two = out.competitors.get(&CompetitorId(2)).unwrap();
        assert_eq!(two.status, CompetitorStatus::Disqualified);
    }

    #[test]
    fn ties_keep_input_order() {
        let events = vec![
            ev(at(9, 0, 0), EventKind::Registration, 3),
            ev(at(9, 0, 0), EventKind::Registration, 1),
            ev(at(9, 0, 0), EventKind::Registration, 2),
        ];
        let out = dispatch(events, &config(), &StopSignal::new());
        let ids: Vec<u32> = out.events.iter().map(|e| e.competitor_id.into_inner()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn redispatching_output_changes_nothing() {
        let first = dispatch(race(), &config(), &StopSignal::new());
        let second = dispatch(first.events.clone(), &config(), &StopSignal::new());
        assert_eq!(second.events, first.events);
        assert!(second.competitors.is_empty());
        assert_eq!(second.synthesized, 0);
    }

    #[test]
    fn stop_passes_events_through_unconsumed() {
        let stop = StopSignal::new();
        stop.request_stop();
        let out = dispatch(race(), &config(), &stop);
        assert!(out.stopped);
        assert!(out.competitors.is_empty());
        assert_eq!(out.events.len(), race().len());
        assert!(out.events.iter().all(|e| !e.is_consumed()));
    }

    #[test]
    fn stop_mid_run_keeps_applied_state() {
        // Sorted, the seventh event is competitor 2's late start.
        let out = dispatch(race(), &config(), &StopSignal::after_checks(7));
        assert!(out.stopped);
        assert_eq!(out.synthesized, 1);
        assert_eq!(out.events.len(), race().len().saturating_add(1));

        let consumed = out.events.iter().take_while(|e| e.is_consumed()).count();
        assert_eq!(consumed, 8);
        assert!(out.events.iter().skip(consumed).all(|e| !e.is_consumed()));
        assert_eq!(out.events.get(6).map(|e| e.kind), Some(EventKind::Disqualified));

        let one = out.competitors.get(&CompetitorId(1)).unwrap();
        assert_eq!(one.status, CompetitorStatus::Running);
        assert_eq!(one.actual_start, Some(at(9, 30, 1)));
        assert_eq!(one.total_shots, 0);
        assert_eq!(one.current_lap, 1);
        let two = out.competitors.get(&CompetitorId(2)).unwrap();
        assert_eq!(two.status, CompetitorStatus::Disqualified);
    }

    #[tokio::test]
    async fn parallel_matches_sequential() {
        let cfg = config();
        let sequential = dispatch(race(), &cfg, &StopSignal::new());
        let parallel = dispatch_parallel(race(), &cfg, &StopSignal::new()).await.unwrap();
        assert_eq!(parallel.competitors, sequential.competitors);
        assert_eq!(parallel.events, sequential.events);
        assert_eq!(parallel.synthesized, sequential.synthesized);
        assert!(!parallel.stopped);
    }

    #[tokio::test]
    async fn parallel_stop_spawns_nothing() {
        let stop = StopSignal::new();
        stop.request_stop();
        let out = dispatch_parallel(race(), &config(), &stop).await.unwrap();
        assert!(out.stopped);
        assert!(out.competitors.is_empty());
        assert_eq!(out.events.len(), race().len());
    }

    #[tokio::test]
    async fn parallel_stop_mid_run_keeps_spawned_competitors() {
        let out = dispatch_parallel(race(), &config(), &StopSignal::after_checks(1))
            .await
            .unwrap();
        assert!(out.stopped);
        assert_eq!(out.synthesized, 1);
        assert_eq!(out.events.len(), race().len().saturating_add(1));
        assert_eq!(out.competitors.keys().copied().collect::<Vec<_>>(), vec![CompetitorId(1)]);
        assert_eq!(
            out.competitors.get(&CompetitorId(1)).map(|c| c.status),
            Some(CompetitorStatus::Finished)
        );

        for event in &out.events {
            assert_eq!(event.is_consumed(), event.competitor_id == CompetitorId(1));
        }
        assert!(out.events.windows(2).all(|w| match w {
            [a, b] => a.time <= b.time,
            _ => true,
        }));
    }
}
