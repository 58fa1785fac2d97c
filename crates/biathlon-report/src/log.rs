//! Human-readable event log.

use std::io::{self, Write};

use biathlon_types::{Event, EventKind, format_time_of_day};

/// One-sentence description of an event.
pub fn describe(event: &Event) -> String {
    let id = event.competitor_id;
    let param = event.parameter_str();
    match event.kind {
        EventKind::Registration => format!("The competitor({id}) registered"),
        EventKind::SetStartTime => {
            format!("The start time for the competitor({id}) was set by a draw to {param}")
        }
        EventKind::OnStartLine => format!("The competitor({id}) is on the start line"),
        EventKind::Started => format!("The competitor({id}) has started"),
        EventKind::OnFiringRange => format!("The competitor({id}) is on the firing range({param})"),
        EventKind::Shot => format!("The target({param}) has been hit by competitor({id})"),
        EventKind::LeftFiringRange => format!("The competitor({id}) left the firing range"),
        EventKind::EnteredPenalty => format!("The competitor({id}) entered the penalty laps"),
        EventKind::LeftPenalty => format!("The competitor({id}) left the penalty laps"),
        EventKind::LapCompleted => format!("The competitor({id}) ended the main lap"),
        EventKind::Abandoned => format!("The competitor({id}) can`t continue: {param}"),
        EventKind::Disqualified => format!("The competitor({id}) is disqualified"),
        EventKind::Finished => format!("The competitor({id}) has finished"),
    }
}

/// Write `[HH:MM:SS.mmm] description` for every event, in the given order.
pub fn write_log<W: Write>(out: &mut W, events: &[Event]) -> io::Result<()> {
    for event in events {
        writeln!(out, "[{}] {}", format_time_of_day(event.time), describe(event))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use biathlon_types::CompetitorId;
    use chrono::NaiveTime;

    use super::*;

    fn ev(kind: EventKind) -> Event {
        Event::new(
            NaiveTime::from_hms_milli_opt(9, 30, 1, 5).unwrap(),
            kind,
            CompetitorId(4),
        )
    }

    #[test]
    fn templates() {
        assert_eq!(describe(&ev(EventKind::Registration)), "The competitor(4) registered");
        assert_eq!(
            describe(&ev(EventKind::SetStartTime).with_parameter("09:30:00.000")),
            "The start time for the competitor(4) was set by a draw to 09:30:00.000"
        );
        assert_eq!(
            describe(&ev(EventKind::OnFiringRange).with_parameter("2")),
            "The competitor(4) is on the firing range(2)"
        );
        assert_eq!(
            describe(&ev(EventKind::Shot).with_parameter("3")),
            "The target(3) has been hit by competitor(4)"
        );
        assert_eq!(
            describe(&ev(EventKind::Abandoned).with_parameter("Lost in the forest")),
            "The competitor(4) can`t continue: Lost in the forest"
        );
        assert_eq!(describe(&ev(EventKind::Disqualified)), "The competitor(4) is disqualified");
        assert_eq!(describe(&ev(EventKind::Finished)), "The competitor(4) has finished");
    }

    #[test]
    fn log_lines_carry_timestamps() {
        let mut buf = Vec::new();
        write_log(&mut buf, &[ev(EventKind::Started), ev(EventKind::LapCompleted)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "[09:30:01.005] The competitor(4) has started\n\
             [09:30:01.005] The competitor(4) ended the main lap\n"
        );
    }
}
