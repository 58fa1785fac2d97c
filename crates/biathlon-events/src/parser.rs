//! Parsing of a single event log line.
//!
//! Line shape: `[HH:MM:SS.mmm] <kind> <competitor> [parameter...]`. Every
//! token after the competitor id is joined with single spaces into the
//! parameter.

use biathlon_types::{CompetitorId, Event, EventKind, parse_time_of_day};

use crate::error::ParseError;

/// Parse one non-blank line into an [`Event`].
pub fn parse_line(line: &str) -> Result<Event, ParseError> {
    let (stamp, rest) = split_timestamp(line)?;
    let time = parse_time_of_day(stamp)?;

    let mut tokens = rest.split_whitespace();
    let (Some(kind_token), Some(id_token)) = (tokens.next(), tokens.next()) else {
        return Err(ParseError::MissingFields);
    };

    let code: u16 = kind_token
        .parse()
        .ok()
        .ok_or_else(|| ParseError::InvalidKind {
            token: kind_token.to_owned(),
        })?;
    let kind = EventKind::try_from(code)?;
    let competitor: CompetitorId = id_token
        .parse()
        .ok()
        .ok_or_else(|| ParseError::InvalidCompetitorId {
            token: id_token.to_owned(),
        })?;

    let parameter = tokens.collect::<Vec<_>>().join(" ");
    let event = Event::new(time, kind, competitor);
    if parameter.is_empty() {
        Ok(event)
    } else {
        Ok(event.with_parameter(parameter))
    }
}

/// Split `[stamp] rest` into `stamp` and the trimmed `rest`.
fn split_timestamp(line: &str) -> Result<(&str, &str), ParseError> {
    let open = line.find('[').ok_or(ParseError::MissingTimestamp)?;
    let close = line.find(']').ok_or(ParseError::MissingTimestamp)?;
    if close <= open {
        return Err(ParseError::MissingTimestamp);
    }
    let stamp = line
        .get(open.saturating_add(1)..close)
        .ok_or(ParseError::MissingTimestamp)?;
    let rest = line.get(close.saturating_add(1)..).unwrap_or("");
    Ok((stamp, rest.trim()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use biathlon_types::UnknownEventKind;
    use chrono::NaiveTime;

    use super::*;

    #[test]
    fn parses_line_without_parameter() {
        let event = parse_line("[09:05:59.867] 1 1").unwrap();
        assert_eq!(event.time, NaiveTime::from_hms_milli_opt(9, 5, 59, 867).unwrap());
        assert_eq!(event.kind, EventKind::Registration);
        assert_eq!(event.competitor_id, CompetitorId(1));
        assert_eq!(event.parameter, None);
        assert!(!event.is_consumed());
    }

    #[test]
    fn parses_single_token_parameter() {
        let event = parse_line("[09:15:00.841] 2 1 09:30:00.000").unwrap();
        assert_eq!(event.kind, EventKind::SetStartTime);
        assert_eq!(event.parameter_str(), "09:30:00.000");
    }

    #[test]
    fn joins_multi_word_parameter() {
        let event = parse_line("[09:59:03.872] 11 1   Lost   in the forest").unwrap();
        assert_eq!(event.kind, EventKind::Abandoned);
        assert_eq!(event.parameter_str(), "Lost in the forest");
    }

    #[test]
    fn missing_timestamp() {
        assert_eq!(parse_line("1 1"), Err(ParseError::MissingTimestamp));
        assert_eq!(parse_line("]09:00:00.000[ 1 1"), Err(ParseError::MissingTimestamp));
    }

    #[test]
    fn invalid_time() {
        assert!(matches!(
            parse_line("[9am] 1 1"),
            Err(ParseError::InvalidTime { .. })
        ));
    }

    #[test]
    fn missing_fields() {
        assert_eq!(parse_line("[09:00:00.000] 1"), Err(ParseError::MissingFields));
        assert_eq!(parse_line("[09:00:00.000]"), Err(ParseError::MissingFields));
    }

    #[test]
    fn invalid_and_unknown_kinds() {
        assert_eq!(
            parse_line("[09:00:00.000] x 1"),
            Err(ParseError::InvalidKind { token: "x".to_owned() })
        );
        assert_eq!(
            parse_line("[09:00:00.000] 12 1"),
            Err(ParseError::UnknownKind {
                source: UnknownEventKind(12)
            })
        );
    }

    #[test]
    fn invalid_competitor_id() {
        assert_eq!(
            parse_line("[09:00:00.000] 1 -4"),
            Err(ParseError::InvalidCompetitorId { token: "-4".to_owned() })
        );
    }
}
