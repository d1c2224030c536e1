//! RRULE values to and from [`RecurrenceRule`].
//!
//! Only FREQ, INTERVAL, COUNT, UNTIL and BYDAY are carried across. Other
//! parts are dropped in both directions with a log line.

use tracing::warn;

use super::datetime::{format_utc, parse_date_time};
use crate::error::ParseError;
use crate::local_datetime::LocalDateTime;
use crate::model::{Frequency, NDay, RecurrenceRule};

/// Parses an RRULE value such as `FREQ=WEEKLY;BYDAY=MO,WE;COUNT=10`.
pub fn parse(value: &str) -> Result<RecurrenceRule, ParseError> {
    let invalid = |reason: &str| ParseError::RecurrenceRule(format!("{reason} in '{value}'"));

    let mut frequency = None;
    let mut rule = RecurrenceRule::default();

    for part in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, val) = part
            .split_once('=')
            .ok_or_else(|| invalid(&format!("malformed part '{part}'")))?;
        let val = val.trim();

        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                let freq: Frequency = val
                    .to_ascii_lowercase()
                    .parse()
                    .map_err(|_| invalid(&format!("unknown FREQ '{val}'")))?;
                frequency = Some(freq);
            }
            "INTERVAL" => {
                rule.interval = Some(val.parse().map_err(|_| invalid("bad INTERVAL"))?);
            }
            "COUNT" => {
                rule.count = Some(val.parse().map_err(|_| invalid("bad COUNT"))?);
            }
            "UNTIL" => {
                let until = parse_date_time(val).ok_or_else(|| invalid("bad UNTIL"))?;
                rule.until = Some(LocalDateTime::from_naive(until.value));
            }
            "BYDAY" => {
                rule.by_day = val
                    .split(',')
                    .filter(|d| !d.trim().is_empty())
                    .map(NDay::parse)
                    .collect::<Result<_, _>>()?;
            }
            other => warn!(part = other, rrule = value, "dropping unsupported RRULE part"),
        }
    }

    let frequency = frequency.ok_or_else(|| invalid("missing FREQ"))?;
    if rule.count.is_some() && rule.until.is_some() {
        warn!(rrule = value, "RRULE has both COUNT and UNTIL");
    }

    Ok(RecurrenceRule {
        object_type: "RecurrenceRule".to_string(),
        frequency: frequency.as_ref().to_string(),
        ..rule
    })
}

/// Writes the RRULE value for `rule`. COUNT wins over UNTIL.
pub fn format(rule: &RecurrenceRule) -> String {
    let mut parts = Vec::new();

    match rule.frequency() {
        Some(freq) => parts.push(format!("FREQ={}", freq.as_ics_str())),
        None if !rule.frequency.is_empty() => {
            parts.push(format!("FREQ={}", rule.frequency.to_ascii_uppercase()))
        }
        None => {}
    }

    if let Some(interval) = rule.interval.filter(|i| *i > 1) {
        parts.push(format!("INTERVAL={interval}"));
    }

    match (rule.count, rule.until) {
        (Some(count), until) => {
            if until.is_some() {
                warn!(count, "recurrence rule has both count and until, writing COUNT only");
            }
            parts.push(format!("COUNT={count}"));
        }
        (None, Some(until)) => parts.push(format!("UNTIL={}", format_utc(&until.as_naive().and_utc()))),
        (None, None) => {}
    }

    if !rule.by_day.is_empty() {
        let days: Vec<String> = rule.by_day.iter().map(NDay::to_string).collect();
        parts.push(format!("BYDAY={}", days.join(",")));
    }

    if has_dropped_parts(rule) {
        warn!(rrule = %parts.join(";"), "recurrence rule filters beyond BYDAY are not exported");
    }

    parts.join(";")
}

fn has_dropped_parts(rule: &RecurrenceRule) -> bool {
    !rule.by_month.is_empty()
        || !rule.by_month_day.is_empty()
        || !rule.by_year_day.is_empty()
        || !rule.by_week_no.is_empty()
        || !rule.by_hour.is_empty()
        || !rule.by_minute.is_empty()
        || !rule.by_second.is_empty()
        || !rule.by_set_pos.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;

    #[test_log::test]
    fn test_parse_weekday_rule() {
        let rule = parse("FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR;UNTIL=20250331T235959Z").unwrap();

        assert_eq!(rule.frequency(), Some(Frequency::Daily));
        let days: Vec<&str> = rule.by_day.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["mo", "tu", "we", "th", "fr"]);
        assert_eq!(rule.until.unwrap().to_string(), "2025-03-31T23:59:59");
        assert_eq!(rule.count, None);
        assert_eq!(rule.object_type, "RecurrenceRule");
    }

    #[test_log::test]
    fn test_parse_ordinal_days_and_interval() {
        let rule = parse("FREQ=MONTHLY;INTERVAL=2;BYDAY=-1FR,+2TU;BYMONTH=3").unwrap();
        assert_eq!(rule.interval, Some(2));
        assert_eq!(rule.by_day, vec![NDay::nth(Weekday::Fr, -1), NDay::nth(Weekday::Tu, 2)]);
        assert!(rule.by_month.is_empty());
    }

    #[test_log::test]
    fn test_parse_keeps_count_and_until() {
        let rule = parse("FREQ=WEEKLY;COUNT=5;UNTIL=20250601").unwrap();
        assert_eq!(rule.count, Some(5));
        assert!(rule.until.is_some());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("BYDAY=MO"), Err(ParseError::RecurrenceRule(_))));
        assert!(matches!(parse("FREQ=FORTNIGHTLY"), Err(ParseError::RecurrenceRule(_))));
        assert!(matches!(parse("FREQ=DAILY;COUNT"), Err(ParseError::RecurrenceRule(_))));
        assert!(matches!(parse("FREQ=DAILY;COUNT=ten"), Err(ParseError::RecurrenceRule(_))));
        assert_eq!(
            parse("FREQ=WEEKLY;BYDAY=XX"),
            Err(ParseError::InvalidDay("XX".to_string()))
        );
    }

    #[test_log::test]
    fn test_format() {
        let rule = RecurrenceRule::new(Frequency::Weekly)
            .with_interval(2)
            .with_by_day([NDay::new(Weekday::Mo), NDay::nth(Weekday::Fr, -1)])
            .with_until(LocalDateTime::parse("2025-03-31T23:59:59").unwrap());
        assert_eq!(format(&rule), "FREQ=WEEKLY;INTERVAL=2;UNTIL=20250331T235959Z;BYDAY=MO,-1FR");

        let mut both = RecurrenceRule::new(Frequency::Daily)
            .with_interval(1)
            .with_count(3);
        both.until = Some(LocalDateTime::parse("2025-03-31T00:00:00").unwrap());
        assert_eq!(format(&both), "FREQ=DAILY;COUNT=3");
    }

    #[test]
    fn test_format_then_parse() {
        let rule = RecurrenceRule::new(Frequency::Yearly)
            .with_count(4)
            .with_by_day([NDay::nth(Weekday::Su, 1)]);
        let back = parse(&format(&rule)).unwrap();
        assert_eq!(back.frequency(), Some(Frequency::Yearly));
        assert_eq!(back.count, Some(4));
        assert_eq!(back.by_day, rule.by_day);
    }
}
