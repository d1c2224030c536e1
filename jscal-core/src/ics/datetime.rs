//! DATE and DATE-TIME values as they appear in iCalendar text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::local_datetime::LocalDateTime;

const DATE_TIME_FORMATS: [&str; 2] = ["%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// A parsed DATE or DATE-TIME value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IcsDateTime {
    pub value: NaiveDateTime,
    /// The value was a bare date.
    pub is_date: bool,
    /// The value carried a trailing `Z`.
    pub is_utc: bool,
}

/// Accepts basic and extended forms, with or without time and trailing `Z`.
pub(crate) fn parse_date_time(value: &str) -> Option<IcsDateTime> {
    let value = value.trim();
    let (value, is_utc) = match value.strip_suffix('Z') {
        Some(rest) => (rest, true),
        None => (value, false),
    };

    if let Some(value) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(IcsDateTime {
            value,
            is_date: false,
            is_utc,
        });
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| IcsDateTime {
            value: date.and_time(chrono::NaiveTime::MIN),
            is_date: true,
            is_utc,
        })
}

pub(crate) fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub(crate) fn format_floating(dt: &LocalDateTime) -> String {
    dt.as_naive().format("%Y%m%dT%H%M%S").to_string()
}

pub(crate) fn format_date(dt: &LocalDateTime) -> String {
    dt.date().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let basic = parse_date_time("20250320T150000").unwrap();
        assert_eq!(basic.value.to_string(), "2025-03-20 15:00:00");
        assert!(!basic.is_date && !basic.is_utc);

        let utc = parse_date_time("20250320T150000Z").unwrap();
        assert!(utc.is_utc);
        assert_eq!(utc.value, basic.value);

        let extended = parse_date_time("2025-03-20T15:00:00").unwrap();
        assert_eq!(extended.value, basic.value);

        let date = parse_date_time("20250320").unwrap();
        assert!(date.is_date);
        assert_eq!(date.value.to_string(), "2025-03-20 00:00:00");
        assert!(parse_date_time("2025-03-20").unwrap().is_date);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date_time("").is_none());
        assert!(parse_date_time("tomorrow").is_none());
        assert!(parse_date_time("20251320T000000").is_none());
    }

    #[test]
    fn test_format() {
        let local = LocalDateTime::parse("2025-03-20T15:04:05").unwrap();
        assert_eq!(format_floating(&local), "20250320T150405");
        assert_eq!(format_date(&local), "20250320");
        assert_eq!(format_utc(&local.as_naive().and_utc()), "20250320T150405Z");
    }
}
