//! ISO 8601 durations.
//!
//! JSCalendar carries durations as literals such as `PT1H30M` or `P1W`.
//! Calendar-length units have no fixed length, so they are approximated:
//! a year is 365 days, a month 30 days and a week 7 days.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::TimeDelta;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::ParseError;
use crate::local_datetime::LocalDateTime;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();

const DURATION_RE: &str = r"^(-)?P(?:(\d+(?:\.\d+)?)Y)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)W)?(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$";

/// Seconds per unit, in capture-group order.
const UNITS: [(usize, i64); 7] = [
    (2, 365 * SECONDS_PER_DAY),
    (3, 30 * SECONDS_PER_DAY),
    (4, 7 * SECONDS_PER_DAY),
    (5, SECONDS_PER_DAY),
    (6, 3600),
    (7, 60),
    (8, 1),
];

fn duration_regex() -> &'static Regex {
    DURATION_REGEX.get_or_init(|| Regex::new(DURATION_RE).unwrap())
}

/// Signed elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(TimeDelta);

impl Duration {
    pub fn zero() -> Self {
        Self(TimeDelta::zero())
    }

    pub fn from_time_delta(delta: TimeDelta) -> Self {
        Self(delta)
    }

    pub fn seconds(secs: i64) -> Self {
        Self(TimeDelta::seconds(secs))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self(TimeDelta::minutes(minutes))
    }

    pub fn hours(hours: i64) -> Self {
        Self(TimeDelta::hours(hours))
    }

    pub fn days(days: i64) -> Self {
        Self(TimeDelta::days(days))
    }

    /// Elapsed time from `start` to `end`; negative when `end` comes first.
    pub fn between(start: &LocalDateTime, end: &LocalDateTime) -> Self {
        *end - *start
    }

    /// Parses `[-]P[nY][nM][nW][nD][T[nH][nM][nS]]`.
    ///
    /// Every component may carry a decimal fraction. A bare `P` is zero.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let caps = duration_regex()
            .captures(s)
            .ok_or_else(|| ParseError::Duration(s.to_string()))?;

        let mut nanos: i128 = 0;
        for (group, unit_secs) in UNITS {
            nanos += component_nanos(&caps, group, unit_secs)
                .ok_or_else(|| ParseError::DurationOverflow(s.to_string()))?;
        }
        if caps.get(1).is_some() {
            nanos = -nanos;
        }

        let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND))
            .map_err(|_| ParseError::DurationOverflow(s.to_string()))?;
        let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        TimeDelta::new(secs, subsec)
            .map(Self)
            .ok_or_else(|| ParseError::DurationOverflow(s.to_string()))
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        self.0
    }

    pub fn num_seconds(&self) -> i64 {
        self.0.num_seconds()
    }

    pub fn num_minutes(&self) -> i64 {
        self.0.num_minutes()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < TimeDelta::zero()
    }

    /// Scales by `numerator / denominator`, truncating toward zero.
    pub fn scale(&self, numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let nanos = self.0.num_nanoseconds()? as i128 * numerator as i128 / denominator as i128;
        i64::try_from(nanos)
            .ok()
            .map(|n| Self(TimeDelta::nanoseconds(n)))
    }
}

fn component_nanos(caps: &Captures<'_>, group: usize, unit_secs: i64) -> Option<i128> {
    let Some(m) = caps.get(group) else {
        return Some(0);
    };
    let unit_nanos = unit_secs as i128 * NANOS_PER_SECOND;
    let (whole, frac) = match m.as_str().split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (m.as_str(), None),
    };

    let mut nanos = whole.parse::<i128>().ok()?.checked_mul(unit_nanos)?;
    if let Some(frac) = frac {
        let fraction: f64 = format!("0.{frac}").parse().ok()?;
        nanos += (fraction * unit_nanos as f64).round() as i128;
    }
    Some(nanos)
}

impl Default for Duration {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("PT0S");
        }

        let magnitude = if self.is_negative() { -self.0 } else { self.0 };
        let total_secs = magnitude.num_seconds();
        let nanos = magnitude.subsec_nanos();

        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str("P")?;

        let days = total_secs / SECONDS_PER_DAY;
        let rem = total_secs % SECONDS_PER_DAY;
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if rem == 0 && nanos == 0 {
            return Ok(());
        }

        f.write_str("T")?;
        let (hours, minutes, seconds) = (rem / 3600, rem % 3600 / 60, rem % 60);
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if nanos > 0 {
            let frac = format!("{nanos:09}");
            write!(f, "{seconds}.{}S", frac.trim_end_matches('0'))?;
        } else if seconds > 0 {
            write!(f, "{seconds}S")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TimeDelta> for Duration {
    fn from(delta: TimeDelta) -> Self {
        Self(delta)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
