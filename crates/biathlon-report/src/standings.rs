//! Final standings table.
//!
//! Each row reads `<result> <id> [<laps>] <penalty> <hits>/<shots>`, where
//! the result is the total time for finishers and the bracketed status for
//! everyone else. Missing laps, an unserved penalty, and any segment with
//! no recorded time print as `{,}`.

use std::collections::BTreeMap;
use std::io::{self, Write};

use biathlon_types::{Competitor, CompetitorId, Segment, format_duration};

/// Title printed above the table.
pub const REPORT_TITLE: &str = "Final Report:";

/// Horizontal rule framing the table.
pub const REPORT_RULE: &str = "============================================";

const EMPTY_SEGMENT: &str = "{,}";

fn segment(seg: &Segment) -> String {
    if !seg.is_timed() {
        return EMPTY_SEGMENT.to_owned();
    }
    format!("{{{}, {:.3}}}", format_duration(seg.elapsed), seg.speed)
}

/// Render one standings row.
pub fn standing_line(competitor: &Competitor) -> String {
    let result = if competitor.is_finished() {
        format_duration(competitor.total_time())
    } else {
        format!("[{}]", competitor.status)
    };

    let laps = competitor
        .laps
        .iter()
        .map(|lap| lap.as_ref().map_or_else(|| EMPTY_SEGMENT.to_owned(), |l| segment(&l.segment)))
        .collect::<Vec<_>>()
        .join(", ");

    let penalty = competitor
        .penalty
        .result
        .as_ref()
        .map_or_else(|| EMPTY_SEGMENT.to_owned(), segment);

    format!(
        "{result} {} [{laps}] {penalty} {}",
        competitor.id,
        competitor.accuracy()
    )
}

/// Write the titled standings table in standings order.
pub fn write_standings<W: Write>(
    out: &mut W,
    competitors: &BTreeMap<CompetitorId, Competitor>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "{REPORT_RULE}")?;
    for competitor in biathlon_core::standings(competitors) {
        writeln!(out, "{}", standing_line(competitor))?;
    }
    writeln!(out, "{REPORT_RULE}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use biathlon_types::{CompetitorStatus, LapRecord};
    use chrono::{NaiveTime, TimeDelta};

    use super::*;

    fn finisher() -> Competitor {
        let mut c = Competitor::new(CompetitorId(1), 2);
        c.status = CompetitorStatus::Finished;
        let done = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        c.laps = vec![
            Some(LapRecord {
                segment: Segment::measure(3_651, TimeDelta::milliseconds(1_742_867)),
                finished_at: done,
            }),
            Some(LapRecord {
                segment: Segment::measure(3_651, TimeDelta::seconds(1_800)),
                finished_at: done,
            }),
        ];
        c.penalty.result = Some(Segment::measure(50, TimeDelta::seconds(60)));
        c.shots_hit = 4;
        c.total_shots = 5;
        c
    }

    #[test]
    fn finisher_row() {
        assert_eq!(
            standing_line(&finisher()),
            "00:59:02.867 1 [{00:29:02.867, 2.095}, {00:30:00.000, 2.028}] {00:01:00.000, 0.833} 4/5"
        );
    }

    #[test]
    fn non_finisher_row() {
        let mut c = Competitor::new(CompetitorId(2), 2);
        c.status = CompetitorStatus::NotStarted;
        assert_eq!(standing_line(&c), "[NotStarted] 2 [{,}, {,}] {,} 0/0");
    }

    #[test]
    fn untimed_segments_print_empty() {
        let mut c = finisher();
        let done = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        c.laps = vec![
            Some(LapRecord {
                segment: Segment::measure(3_651, TimeDelta::zero()),
                finished_at: done,
            }),
            Some(LapRecord {
                segment: Segment::measure(3_651, TimeDelta::seconds(1_800)),
                finished_at: done,
            }),
        ];
        c.penalty.result = Some(Segment::measure(50, TimeDelta::zero()));
        assert_eq!(
            standing_line(&c),
            "00:30:00.000 1 [{,}, {00:30:00.000, 2.028}] {,} 4/5"
        );
    }

    #[test]
    fn table_is_framed_and_ordered() {
        let mut dq = Competitor::new(CompetitorId(3), 2);
        dq.status = CompetitorStatus::Disqualified;
        let map: BTreeMap<CompetitorId, Competitor> =
            [dq, finisher()].into_iter().map(|c| (c.id, c)).collect();

        let mut buf = Vec::new();
        write_standings(&mut buf, &map).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&""));
        assert_eq!(lines.get(1), Some(&REPORT_TITLE));
        assert_eq!(lines.get(2), Some(&REPORT_RULE));
        assert!(lines.get(3).unwrap().starts_with("00:59:02.867 1 "));
        assert!(lines.get(4).unwrap().starts_with("[Disqualified] 3 "));
        assert_eq!(lines.get(5), Some(&REPORT_RULE));
    }
}
