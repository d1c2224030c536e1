use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::recurrence::RecurrenceRule;
use crate::local_datetime::LocalDateTime;

/// A custom time zone definition, keyed by `/`-prefixed id in `timeZones`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZone {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub tz_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standard: Vec<TimeZoneRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daylight: Vec<TimeZoneRule>,
}

impl TimeZone {
    pub fn new(tz_id: impl Into<String>) -> Self {
        Self {
            object_type: Some("TimeZone".to_string()),
            tz_id: tz_id.into(),
            ..Default::default()
        }
    }
}

/// One observance (standard or daylight) of a custom time zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneRule {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<LocalDateTime>,
    #[serde(default)]
    pub offset_from: String,
    #[serde(default)]
    pub offset_to: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}
