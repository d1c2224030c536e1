//! Recurrence rules.
//!
//! Rules are stored and translated, never expanded into occurrences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::{Frequency, Weekday};
use super::patch::PatchObject;
use crate::error::ParseError;
use crate::local_datetime::LocalDateTime;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<String>,
    /// 0 = Monday through 6 = Sunday
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_day_of_week: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_day: Vec<NDay>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month_day: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_month: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_year_day: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_week_no: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_hour: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_minute: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_second: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_set_pos: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<LocalDateTime>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            object_type: "RecurrenceRule".to_string(),
            frequency: frequency.as_ref().to_string(),
            ..Default::default()
        }
    }

    pub fn with_interval(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_until(mut self, until: LocalDateTime) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_by_day(mut self, days: impl IntoIterator<Item = NDay>) -> Self {
        self.by_day.extend(days);
        self
    }

    /// The parsed frequency, if it is one of the known values.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency.parse().ok()
    }
}

/// A day of the week, optionally restricted to its n-th occurrence in the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NDay {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth_of_period: Option<i64>,
}

impl NDay {
    pub fn new(day: Weekday) -> Self {
        Self {
            object_type: None,
            day: day.as_ref().to_string(),
            nth_of_period: None,
        }
    }

    pub fn nth(day: Weekday, nth: i64) -> Self {
        Self {
            nth_of_period: Some(nth),
            ..Self::new(day)
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.day.parse().ok()
    }

    /// Parses an iCalendar BYDAY token such as `MO`, `2TU` or `-1FR`.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let value = value.trim();
        let invalid = || ParseError::InvalidDay(value.to_string());

        let split = value.len().checked_sub(2).ok_or_else(invalid)?;
        if !value.is_char_boundary(split) {
            return Err(invalid());
        }
        let (num_part, day_part) = value.split_at(split);

        let day = Weekday::from_name(day_part)
            .filter(|_| day_part.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(invalid)?;

        let nth_of_period = match num_part {
            "" => None,
            n => Some(n.parse::<i64>().map_err(|_| invalid())?),
        };

        Ok(Self {
            nth_of_period,
            ..Self::new(day)
        })
    }
}

impl FromStr for NDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes the iCalendar BYDAY form, e.g. `-1FR`.
impl fmt::Display for NDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.nth_of_period {
            write!(f, "{n}")?;
        }
        match self.weekday() {
            Some(day) => f.write_str(day.as_ics_str()),
            None => f.write_str(&self.day.to_uppercase()),
        }
    }
}
