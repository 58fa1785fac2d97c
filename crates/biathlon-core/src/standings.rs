//! Final standings order.
//!
//! Finished competitors come first, fastest total time first. Everyone else
//! follows by status: not finished, not started, still running (only seen
//! with truncated input), then disqualified. Remaining ties break by bib
//! number, so the order is total.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use biathlon_types::{Competitor, CompetitorId, CompetitorStatus};

/// Rank of a status in the standings. Lower ranks print first.
const fn status_rank(status: CompetitorStatus) -> u8 {
    match status {
        CompetitorStatus::Finished => 0,
        CompetitorStatus::NotFinished => 1,
        CompetitorStatus::NotStarted => 2,
        CompetitorStatus::Running => 3,
        CompetitorStatus::Disqualified => 4,
    }
}

/// Compare two competitors for the standings.
pub fn compare(a: &Competitor, b: &Competitor) -> Ordering {
    status_rank(a.status)
        .cmp(&status_rank(b.status))
        .then_with(|| {
            if a.is_finished() && b.is_finished() {
                a.total_time().cmp(&b.total_time())
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Competitors in standings order.
pub fn standings(competitors: &BTreeMap<CompetitorId, Competitor>) -> Vec<&Competitor> {
    let mut ordered: Vec<&Competitor> = competitors.values().collect();
    ordered.sort_by(|a, b| compare(a, b));
    ordered
}
