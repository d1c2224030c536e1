//! Floating wall-clock date-times.
//!
//! A `LocalDateTime` is a calendar reading with no zone attached: the
//! `start` of a JSCalendar event is interpreted in the event's `timeZone`,
//! or in whatever zone the reader is in when none is given.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::duration::Duration;
use crate::error::ParseError;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

static LOCAL_DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();

const LOCAL_DATETIME_RE: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?$";

fn local_datetime_regex() -> &'static Regex {
    LOCAL_DATETIME_REGEX.get_or_init(|| Regex::new(LOCAL_DATETIME_RE).unwrap())
}

/// A date and time without a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    /// The zero moment, 0001-01-01T00:00:00.
    pub fn zero() -> Self {
        let naive = NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self(naive)
    }

    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(Self)
    }

    /// Keeps the wall-clock reading of `dt` and drops its zone.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.naive_local())
    }

    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS[.fraction]`.
    ///
    /// A trailing `Z` or `±HH:MM` is accepted and discarded.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let literal = strip_zone(s);
        if !local_datetime_regex().is_match(literal) {
            return Err(ParseError::LocalDateTime(s.to_string()));
        }

        NaiveDateTime::parse_from_str(literal, FORMAT)
            .map(Self)
            .map_err(|_| ParseError::LocalDateTime(s.to_string()))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration.as_time_delta()).map(Self)
    }

    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        self.0.checked_sub_signed(duration.as_time_delta()).map(Self)
    }

    /// Like [`checked_add`](Self::checked_add), but clamps to the
    /// representable range instead of failing.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        self.checked_add(duration).unwrap_or_else(|| {
            if duration.is_negative() {
                Self(NaiveDateTime::MIN)
            } else {
                Self(NaiveDateTime::MAX)
            }
        })
    }

    pub fn saturating_sub(&self, duration: Duration) -> Self {
        self.checked_sub(duration).unwrap_or_else(|| {
            if duration.is_negative() {
                Self(NaiveDateTime::MAX)
            } else {
                Self(NaiveDateTime::MIN)
            }
        })
    }
}

fn strip_zone(s: &str) -> &str {
    if let Some(rest) = s.strip_suffix(['Z', 'z']) {
        return rest;
    }

    let bytes = s.as_bytes();
    let n = bytes.len();
    if n > 6 && matches!(bytes[n - 6], b'+' | b'-') && bytes[n - 3] == b':' {
        return &s[..n - 6];
    }
    s
}

impl Default for LocalDateTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for LocalDateTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for LocalDateTime {
    fn from(naive: NaiveDateTime) -> Self {
        Self(naive)
    }
}

/// Saturates at the ends of the representable range.
impl Add<Duration> for LocalDateTime {
    type Output = LocalDateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Duration> for LocalDateTime {
    type Output = LocalDateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sub<LocalDateTime> for LocalDateTime {
    type Output = Duration;

    fn sub(self, rhs: LocalDateTime) -> Self::Output {
        Duration::from_time_delta(self.0 - rhs.0)
    }
}

impl Serialize for LocalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

/// Accessors for a `LocalDateTime` that may be absent.
///
/// An absent value reads as the zero moment everywhere, so callers never
/// have to special-case it.
pub trait OptionalLocalDateTime {
    fn or_zero(&self) -> LocalDateTime;

    fn is_zero(&self) -> bool {
        self.or_zero().is_zero()
    }

    fn same_moment(&self, other: &Option<LocalDateTime>) -> bool {
        self.or_zero() == other.or_zero()
    }

    fn is_before(&self, other: &Option<LocalDateTime>) -> bool {
        self.or_zero() < other.or_zero()
    }

    fn is_after(&self, other: &Option<LocalDateTime>) -> bool {
        self.or_zero() > other.or_zero()
    }

    fn format_or_zero(&self) -> String {
        self.or_zero().to_string()
    }
}

impl OptionalLocalDateTime for Option<LocalDateTime> {
    fn or_zero(&self) -> LocalDateTime {
        self.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_parse_plain() {
        let dt = LocalDateTime::parse("2025-03-20T15:30:45").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 20);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 45);
        assert_eq!(dt.nanosecond(), 0);
    }

    #[test]
    fn test_parse_strips_zone_designators() {
        let plain = LocalDateTime::parse("2025-03-20T15:30:45").unwrap();
        assert_eq!(LocalDateTime::parse("2025-03-20T15:30:45Z").unwrap(), plain);
        assert_eq!(LocalDateTime::parse("2025-03-20T15:30:45+05:30").unwrap(), plain);
        assert_eq!(LocalDateTime::parse("2025-03-20T15:30:45-08:00").unwrap(), plain);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in [
            "2025-03-20",
            "2025-03-20 15:30:45",
            "not a date",
            "2025-13-01T00:00:00",
            "2025-3-5T1:2:3",
            "2025-03-20T15:30:45.",
            "",
        ] {
            let err = LocalDateTime::parse(input).unwrap_err();
            assert_eq!(err, ParseError::LocalDateTime(input.to_string()));
        }
    }

    #[test]
    fn test_fraction_round_trips() {
        let dt = LocalDateTime::parse("2025-03-20T15:30:45.123456789").unwrap();
        assert_eq!(dt.nanosecond(), 123_456_789);
        assert_eq!(dt.to_string(), "2025-03-20T15:30:45.123456789");
        assert_eq!(LocalDateTime::parse(&dt.to_string()).unwrap(), dt);
    }

    #[test]
    fn test_display_omits_zero_fraction_and_zone() {
        let dt = LocalDateTime::new(2024, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(dt.to_string(), "2024-01-05T09:00:00");
    }

    #[test]
    fn test_from_datetime_keeps_wall_clock() {
        let utc = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .unwrap();

        // Same wall-clock reading, different instants: equal as floating times
        assert_eq!(LocalDateTime::from_datetime(&utc), LocalDateTime::from_datetime(&plus_two));
    }

    #[test]
    fn test_from_datetime_named_zone() {
        let ny = chrono_tz::America::New_York
            .with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
            .unwrap();
        let local = LocalDateTime::from_datetime(&ny);
        assert_eq!(local.to_string(), "2025-01-15T09:30:00");
    }

    #[test]
    fn test_comparison() {
        let a = LocalDateTime::new(2025, 1, 1, 10, 0, 0).unwrap();
        let b = LocalDateTime::new(2025, 1, 1, 11, 0, 0).unwrap();
        assert!(a < b);
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_arithmetic() {
        let start = LocalDateTime::new(2025, 1, 31, 23, 0, 0).unwrap();
        let later = start + Duration::parse("PT2H").unwrap();
        assert_eq!(later.to_string(), "2025-02-01T01:00:00");
        assert_eq!(later - Duration::parse("PT2H").unwrap(), start);
        assert_eq!((later - start).to_string(), "PT2H");
    }

    #[test]
    fn test_arithmetic_saturates_at_range_ends() {
        let start = LocalDateTime::parse("2025-01-01T00:00:00").unwrap();
        let far = Duration::parse("P300000Y").unwrap();

        assert_eq!(start.checked_add(far), None);
        assert_eq!((start + far).as_naive(), NaiveDateTime::MAX);
        assert_eq!((start - far).as_naive(), NaiveDateTime::MIN);
        let back = Duration::from_time_delta(-far.as_time_delta());
        assert_eq!((start + back).as_naive(), NaiveDateTime::MIN);
    }

    #[test]
    fn test_absent_reads_as_zero() {
        let absent: Option<LocalDateTime> = None;
        let present = Some(LocalDateTime::new(2025, 1, 1, 0, 0, 0).unwrap());

        assert!(absent.is_zero());
        assert_eq!(absent.format_or_zero(), "0001-01-01T00:00:00");
        assert!(absent.same_moment(&None));
        assert!(!absent.same_moment(&present));
        assert!(absent.is_before(&present));
        assert!(present.is_after(&absent));
        assert!(!present.is_zero());
    }

    #[test]
    fn test_serde_string_form() {
        let dt = LocalDateTime::new(2025, 3, 20, 15, 30, 0).unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2025-03-20T15:30:00\"");

        let back: LocalDateTime = serde_json::from_str("\"2025-03-20T15:30:00Z\"").unwrap();
        assert_eq!(back, dt);

        assert!(serde_json::from_str::<LocalDateTime>("\"2025-03-20\"").is_err());
    }
}
