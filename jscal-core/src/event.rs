//! JSCalendar events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{JscalError, JscalResult, ParseError};
use crate::local_datetime::LocalDateTime;
use crate::model::{
    Alert, EventStatus, Link, Location, Participant, PatchObject, RecurrenceRule, Relation,
    TimeZone, VirtualLocation,
};
use crate::validate::{self, ValidationErrors};

/// A scheduled amount of time on a calendar (RFC 8984 section 2.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    #[serde(default)]
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prod_id: Option<String>,

    // What
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_content_type: Option<String>,
    /// All-day flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_without_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localizations: BTreeMap<String, PatchObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    // When
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<LocalDateTime>,
    /// ISO 8601 duration literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub time_zones: BTreeMap<String, TimeZone>,

    // Recurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_id: Option<LocalDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_id_time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub recurrence_overrides: BTreeMap<String, PatchObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_recurrence_rules: Vec<RecurrenceRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded: Option<bool>,

    // Scheduling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_busy_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reply_to: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_by: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub participants: BTreeMap<String, Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_status: Option<String>,

    // Alerts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alerts: BTreeMap<String, Alert>,

    // Where
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub virtual_locations: BTreeMap<String, VirtualLocation>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, Relation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Properties not modelled above (vendor extensions), kept verbatim
    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Event {
    /// A new event starting now, stamped as created and updated now.
    pub fn new(uid: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            object_type: "Event".to_string(),
            uid: uid.into(),
            title: Some(title.into()),
            created: Some(now),
            updated: Some(now),
            sequence: Some(0),
            start: Some(LocalDateTime::from_datetime(&now)),
            ..Default::default()
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.show_without_time.unwrap_or(false)
    }

    /// The parsed `duration`.
    pub fn duration(&self) -> JscalResult<Duration> {
        let literal = self
            .duration
            .as_deref()
            .ok_or(JscalError::MissingField("duration"))?;
        Ok(Duration::parse(literal)?)
    }

    /// `start + duration`.
    pub fn end_time(&self) -> JscalResult<LocalDateTime> {
        let start = self.start.ok_or(JscalError::MissingField("start"))?;
        let duration = self.duration()?;
        start
            .checked_add(duration)
            .ok_or_else(|| ParseError::DurationOverflow(duration.to_string()).into())
    }

    pub fn set_start(&mut self, start: LocalDateTime) {
        self.start = Some(start);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration.to_string());
    }

    pub fn set_status(&mut self, status: EventStatus) {
        self.status = Some(status.as_ref().to_string());
    }

    pub fn add_participant(&mut self, id: impl Into<String>, participant: Participant) {
        self.participants.insert(id.into(), participant);
    }

    pub fn add_location(&mut self, id: impl Into<String>, location: Location) {
        self.locations.insert(id.into(), location);
    }

    pub fn add_virtual_location(&mut self, id: impl Into<String>, location: VirtualLocation) {
        self.virtual_locations.insert(id.into(), location);
    }

    pub fn add_alert(&mut self, id: impl Into<String>, alert: Alert) {
        self.alerts.insert(id.into(), alert);
    }

    pub fn add_link(&mut self, id: impl Into<String>, link: Link) {
        self.links.insert(id.into(), link);
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.insert(category.into(), true);
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.insert(keyword.into(), true);
    }

    pub fn set_recurrence(&mut self, rules: Vec<RecurrenceRule>) {
        self.recurrence_rules = rules;
    }

    pub fn is_recurring(&self) -> bool {
        !self.recurrence_rules.is_empty()
    }

    /// Marks the event as modified: `updated` becomes now and `sequence` goes up by one.
    pub fn touch(&mut self) {
        self.updated = Some(Utc::now());
        self.sequence = Some(self.sequence.map_or(1, |s| s + 1));
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate::validate_event(Some(self))
    }

    pub fn to_json(&self) -> JscalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> JscalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
