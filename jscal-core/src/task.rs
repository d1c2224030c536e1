//! JSCalendar tasks.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{JscalError, JscalResult};
use crate::local_datetime::LocalDateTime;
use crate::model::{
    Alert, Link, Location, Participant, PatchObject, Progress, RecurrenceRule, Relation, TimeZone,
    VirtualLocation,
};
use crate::validate::{self, ValidationErrors};

/// An action item, assignment or to-do (RFC 8984 section 2.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_content_type: Option<String>,
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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<LocalDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<LocalDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub time_zones: BTreeMap<String, TimeZone>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_updated: Option<DateTime<Utc>>,

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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alerts: BTreeMap<String, Alert>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub virtual_locations: BTreeMap<String, VirtualLocation>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, Relation>,

    /// needs-action, in-process, completed or cancelled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Task {
    pub fn new(uid: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            object_type: "Task".to_string(),
            uid: uid.into(),
            title: Some(title.into()),
            created: Some(now),
            updated: Some(now),
            sequence: Some(0),
            progress: Some(Progress::NeedsAction.as_ref().to_string()),
            ..Default::default()
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn is_completed(&self) -> bool {
        self.progress() == Some(Progress::Completed)
    }

    /// Due before `now` and not yet completed.
    pub fn is_overdue_at(&self, now: LocalDateTime) -> bool {
        match self.due {
            Some(due) => !self.is_completed() && due < now,
            None => false,
        }
    }

    /// Like [`Task::is_overdue_at`], reading the wall clock of the local zone.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(LocalDateTime::from_datetime(&Local::now()))
    }

    /// Records progress and marks the task as modified.
    pub fn set_progress(&mut self, progress: Progress, percent_complete: i64) {
        self.progress = Some(progress.as_ref().to_string());
        self.percent_complete = Some(percent_complete);
        self.progress_updated = Some(Utc::now());
        self.touch();
    }

    pub fn estimated_duration(&self) -> JscalResult<Duration> {
        let literal = self
            .estimated_duration
            .as_deref()
            .ok_or(JscalError::MissingField("estimatedDuration"))?;
        Ok(Duration::parse(literal)?)
    }

    /// The share of the estimate still outstanding given `percentComplete`.
    pub fn time_to_complete(&self) -> JscalResult<Duration> {
        let estimate = self.estimated_duration()?;
        if self.is_completed() {
            return Ok(Duration::zero());
        }
        let done = self.percent_complete.unwrap_or(0).clamp(0, 100);
        Ok(estimate.scale(100 - done, 100).unwrap_or(estimate))
    }

    pub fn due_time(&self) -> JscalResult<LocalDateTime> {
        self.due.ok_or(JscalError::MissingField("due"))
    }

    pub fn start_time(&self) -> JscalResult<LocalDateTime> {
        self.start.ok_or(JscalError::MissingField("start"))
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

    pub fn touch(&mut self) {
        self.updated = Some(Utc::now());
        self.sequence = Some(self.sequence.map_or(1, |s| s + 1));
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate::validate_task(Some(self))
    }

    pub fn to_json(&self) -> JscalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> JscalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> LocalDateTime {
        LocalDateTime::parse(s).unwrap()
    }

    #[test]
    fn test_new_task_needs_action() {
        let task = Task::new("task-1", "Write report");
        assert_eq!(task.object_type, "Task");
        assert_eq!(task.progress(), Some(Progress::NeedsAction));
        assert!(!task.is_completed());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_set_progress_touches() {
        let mut task = Task::new("task-1", "Write report");
        task.set_progress(Progress::InProcess, 40);
        assert_eq!(task.progress(), Some(Progress::InProcess));
        assert_eq!(task.percent_complete, Some(40));
        assert_eq!(task.sequence, Some(1));
        assert!(task.progress_updated.is_some());

        task.set_progress(Progress::Completed, 100);
        assert!(task.is_completed());
        assert_eq!(task.sequence, Some(2));
    }

    #[test]
    fn test_overdue() {
        let mut task = Task::new("task-1", "File taxes");
        let now = at("2025-04-20T12:00:00");
        assert!(!task.is_overdue_at(now));

        task.due = Some(at("2025-04-15T23:59:59"));
        assert!(task.is_overdue_at(now));
        assert!(!task.is_overdue_at(at("2025-04-01T00:00:00")));

        task.set_progress(Progress::Completed, 100);
        assert!(!task.is_overdue_at(now));
    }

    #[test]
    fn test_time_to_complete() {
        let mut task = Task::new("task-1", "Migrate database");
        assert!(matches!(
            task.time_to_complete(),
            Err(JscalError::MissingField("estimatedDuration"))
        ));

        task.estimated_duration = Some("PT8H".into());
        assert_eq!(task.time_to_complete().unwrap(), Duration::hours(8));

        task.set_progress(Progress::InProcess, 25);
        assert_eq!(task.time_to_complete().unwrap(), Duration::hours(6));

        task.set_progress(Progress::Completed, 100);
        assert!(task.time_to_complete().unwrap().is_zero());
    }

    #[test]
    fn test_due_and_start_accessors() {
        let mut task = Task::new("task-1", "Review");
        assert!(matches!(task.due_time(), Err(JscalError::MissingField("due"))));
        task.due = Some(at("2025-05-01T09:00:00"));
        task.start = Some(at("2025-04-28T09:00:00"));
        assert_eq!(task.due_time().unwrap().day(), 1);
        assert_eq!(task.start_time().unwrap().day(), 28);
    }
}
