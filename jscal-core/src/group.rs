//! JSCalendar groups: collections of events and tasks.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JscalError, JscalResult};
use crate::event::Event;
use crate::model::{Link, PatchObject};
use crate::object::CalendarObject;
use crate::task::Task;
use crate::validate::{self, ValidationErrors};

/// A collection of events and tasks (RFC 8984 section 2.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
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
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,

    #[serde(default)]
    pub entries: Vec<CalendarObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Group {
    pub fn new(uid: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            object_type: "Group".to_string(),
            uid: uid.into(),
            title: Some(title.into()),
            created: Some(now),
            updated: Some(now),
            sequence: Some(0),
            ..Default::default()
        }
    }

    /// Adds an event or task. Groups cannot be nested and uids must be unique.
    pub fn add_entry(&mut self, entry: impl Into<CalendarObject>) -> JscalResult<()> {
        let entry = entry.into();
        if let CalendarObject::Group(_) = entry {
            return Err(JscalError::InvalidEntryType(entry.type_name()));
        }
        if self.entry(entry.uid()).is_some() {
            return Err(JscalError::DuplicateEntry(entry.uid().to_string()));
        }

        self.entries.push(entry);
        self.touch();
        Ok(())
    }

    pub fn remove_entry(&mut self, uid: &str) -> JscalResult<CalendarObject> {
        let index = self
            .entries
            .iter()
            .position(|e| e.uid() == uid)
            .ok_or_else(|| JscalError::EntryNotFound(uid.to_string()))?;

        let removed = self.entries.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn entry(&self, uid: &str) -> Option<&CalendarObject> {
        self.entries.iter().find(|e| e.uid() == uid)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().filter_map(CalendarObject::as_event)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().filter_map(CalendarObject::as_task)
    }

    pub fn count_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn count_events(&self) -> usize {
        self.events().count()
    }

    pub fn count_tasks(&self) -> usize {
        self.tasks().count()
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.insert(keyword.into(), true);
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.insert(category.into(), true);
    }

    pub fn add_link(&mut self, id: impl Into<String>, link: Link) {
        self.links.insert(id.into(), link);
    }

    pub fn touch(&mut self) {
        self.updated = Some(Utc::now());
        self.sequence = Some(self.sequence.map_or(1, |s| s + 1));
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate::validate_group(Some(self))
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

    #[test]
    fn test_add_and_query_entries() {
        let mut group = Group::new("g1", "Project");
        group.add_entry(Event::new("e1", "Kickoff")).unwrap();
        group.add_entry(Task::new("t1", "Draft plan")).unwrap();
        group.add_entry(Task::new("t2", "Review plan")).unwrap();

        assert_eq!(group.count_entries(), 3);
        assert_eq!(group.count_events(), 1);
        assert_eq!(group.count_tasks(), 2);
        assert_eq!(group.entry("t2").map(CalendarObject::type_name), Some("Task"));
        assert!(group.entry("missing").is_none());
        assert_eq!(group.sequence, Some(3));
        assert!(group.validate().is_ok());
    }

    #[test]
    fn test_add_entry_rejects_duplicates_and_groups() {
        let mut group = Group::new("g1", "Project");
        group.add_entry(Event::new("e1", "Kickoff")).unwrap();

        assert!(matches!(
            group.add_entry(Task::new("e1", "Clash")),
            Err(JscalError::DuplicateEntry(uid)) if uid == "e1"
        ));
        assert!(matches!(
            group.add_entry(Group::new("g2", "Nested")),
            Err(JscalError::InvalidEntryType("Group"))
        ));
        assert_eq!(group.count_entries(), 1);
        assert_eq!(group.sequence, Some(1));
    }

    #[test]
    fn test_remove_entry() {
        let mut group = Group::new("g1", "Project");
        group.add_entry(Event::new("e1", "Kickoff")).unwrap();

        let removed = group.remove_entry("e1").unwrap();
        assert_eq!(removed.uid(), "e1");
        assert_eq!(group.count_entries(), 0);
        assert_eq!(group.sequence, Some(2));

        assert!(matches!(
            group.remove_entry("e1"),
            Err(JscalError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_entries_decode_by_type() {
        let json = r#"{
            "@type": "Group",
            "uid": "g1",
            "entries": [
                {"@type": "Event", "uid": "e1", "start": "2025-01-01T09:00:00"},
                {"@type": "Task", "uid": "t1"}
            ]
        }"#;

        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.count_events(), 1);
        assert_eq!(group.count_tasks(), 1);

        let bad = r#"{"@type": "Group", "uid": "g1", "entries": [{"uid": "x"}]}"#;
        assert!(serde_json::from_str::<Group>(bad).is_err());
    }
}
