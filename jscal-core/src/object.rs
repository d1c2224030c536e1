//! Polymorphic JSCalendar objects and JSON decoding.
//!
//! JSON objects are discriminated by their `@type` member. Decoding peeks
//! at it first and then dispatches to the concrete type, so a list may mix
//! events, tasks and groups.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use tracing::debug;

use crate::error::{JscalError, JscalResult};
use crate::event::Event;
use crate::group::Group;
use crate::task::Task;
use crate::validate::ValidationErrors;

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarObject {
    Event(Event),
    Task(Task),
    Group(Group),
}

impl CalendarObject {
    pub fn uid(&self) -> &str {
        match self {
            CalendarObject::Event(e) => &e.uid,
            CalendarObject::Task(t) => &t.uid,
            CalendarObject::Group(g) => &g.uid,
        }
    }

    /// The `@type` this variant serializes as.
    pub fn type_name(&self) -> &'static str {
        match self {
            CalendarObject::Event(_) => "Event",
            CalendarObject::Task(_) => "Task",
            CalendarObject::Group(_) => "Group",
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            CalendarObject::Event(e) => e.validate(),
            CalendarObject::Task(t) => t.validate(),
            CalendarObject::Group(g) => g.validate(),
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            CalendarObject::Event(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            CalendarObject::Task(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            CalendarObject::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Decodes a JSON value by its `@type`, without validating it.
    pub fn from_value(value: Value) -> JscalResult<Self> {
        let type_name = value
            .get("@type")
            .and_then(Value::as_str)
            .ok_or(JscalError::MissingType)?;

        match type_name {
            "Event" => Ok(CalendarObject::Event(serde_json::from_value(value)?)),
            "Task" => Ok(CalendarObject::Task(serde_json::from_value(value)?)),
            "Group" => Ok(CalendarObject::Group(serde_json::from_value(value)?)),
            other => Err(JscalError::UnknownType(other.to_string())),
        }
    }

    pub fn to_json(&self) -> JscalResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Event> for CalendarObject {
    fn from(event: Event) -> Self {
        CalendarObject::Event(event)
    }
}

impl From<Task> for CalendarObject {
    fn from(task: Task) -> Self {
        CalendarObject::Task(task)
    }
}

impl From<Group> for CalendarObject {
    fn from(group: Group) -> Self {
        CalendarObject::Group(group)
    }
}

impl Serialize for CalendarObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CalendarObject::Event(e) => e.serialize(serializer),
            CalendarObject::Task(t) => t.serialize(serializer),
            CalendarObject::Group(g) => g.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CalendarObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CalendarObject::from_value(value).map_err(de::Error::custom)
    }
}

/// Decodes and validates one object of any type.
pub fn parse(data: &str) -> JscalResult<CalendarObject> {
    let value: Value = serde_json::from_str(data)?;
    let object = CalendarObject::from_value(value)?;
    object.validate()?;
    debug!(uid = object.uid(), kind = object.type_name(), "parsed calendar object");
    Ok(object)
}

/// Decodes and validates a JSON array of objects of any type.
///
/// The first failing element aborts the decode; its index is part of the error.
pub fn parse_all(data: &str) -> JscalResult<Vec<CalendarObject>> {
    let values: Vec<Value> = serde_json::from_str(data)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            CalendarObject::from_value(value)
                .and_then(|object| {
                    object.validate()?;
                    Ok(object)
                })
                .map_err(|source| JscalError::AtIndex {
                    index,
                    source: Box::new(source),
                })
        })
        .collect()
}

fn expect_variant<T>(
    object: CalendarObject,
    expected: &'static str,
    pick: impl FnOnce(CalendarObject) -> Result<T, CalendarObject>,
) -> JscalResult<T> {
    pick(object).map_err(|other| JscalError::UnexpectedType {
        expected,
        found: other.type_name(),
    })
}

fn into_event(object: CalendarObject) -> Result<Event, CalendarObject> {
    match object {
        CalendarObject::Event(e) => Ok(e),
        other => Err(other),
    }
}

fn into_task(object: CalendarObject) -> Result<Task, CalendarObject> {
    match object {
        CalendarObject::Task(t) => Ok(t),
        other => Err(other),
    }
}

fn into_group(object: CalendarObject) -> Result<Group, CalendarObject> {
    match object {
        CalendarObject::Group(g) => Ok(g),
        other => Err(other),
    }
}

pub fn parse_event(data: &str) -> JscalResult<Event> {
    expect_variant(parse(data)?, "Event", into_event)
}

pub fn parse_task(data: &str) -> JscalResult<Task> {
    expect_variant(parse(data)?, "Task", into_task)
}

pub fn parse_group(data: &str) -> JscalResult<Group> {
    expect_variant(parse(data)?, "Group", into_group)
}

fn parse_all_of<T>(
    data: &str,
    expected: &'static str,
    pick: fn(CalendarObject) -> Result<T, CalendarObject>,
) -> JscalResult<Vec<T>> {
    parse_all(data)?
        .into_iter()
        .enumerate()
        .map(|(index, object)| {
            expect_variant(object, expected, pick).map_err(|source| JscalError::AtIndex {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

pub fn parse_all_events(data: &str) -> JscalResult<Vec<Event>> {
    parse_all_of(data, "Event", into_event)
}

pub fn parse_all_tasks(data: &str) -> JscalResult<Vec<Task>> {
    parse_all_of(data, "Task", into_task)
}

pub fn parse_all_groups(data: &str) -> JscalResult<Vec<Group>> {
    parse_all_of(data, "Group", into_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{"@type":"Event","uid":"e1","title":"Lunch","start":"2025-03-20T12:00:00","duration":"PT1H"}"#;
    const TASK: &str = r#"{"@type":"Task","uid":"t1","title":"Buy milk","due":"2025-03-21T18:00:00"}"#;

    #[test]
    fn test_parse_dispatches_on_type() {
        let event = parse(EVENT).unwrap();
        assert_eq!(event.type_name(), "Event");
        assert_eq!(event.uid(), "e1");

        let task = parse(TASK).unwrap();
        assert!(task.as_task().is_some());
    }

    #[test]
    fn test_parse_rejects_missing_and_unknown_type() {
        assert!(matches!(parse(r#"{"uid":"x"}"#), Err(JscalError::MissingType)));
        assert!(matches!(parse(r#"{"@type":7,"uid":"x"}"#), Err(JscalError::MissingType)));
        match parse(r#"{"@type":"Journal","uid":"x"}"#) {
            Err(JscalError::UnknownType(t)) => assert_eq!(t, "Journal"),
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_validates() {
        let err = parse(r#"{"@type":"Event","uid":"","start":"2025-03-20T12:00:00"}"#).unwrap_err();
        match err {
            JscalError::Validation(errors) => assert_eq!(errors.first().unwrap().field, "uid"),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_all_mixed() {
        let objects = parse_all(&format!("[{EVENT},{TASK}]")).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].type_name(), "Event");
        assert_eq!(objects[1].type_name(), "Task");
    }

    #[test]
    fn test_parse_all_reports_index() {
        let err = parse_all(&format!(r#"[{EVENT},{{"@type":"Nope"}}]"#)).unwrap_err();
        match err {
            JscalError::AtIndex { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, JscalError::UnknownType(_)));
            }
            other => panic!("expected AtIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_parsers() {
        assert_eq!(parse_event(EVENT).unwrap().uid, "e1");
        assert!(matches!(
            parse_event(TASK),
            Err(JscalError::UnexpectedType { expected: "Event", found: "Task" })
        ));
        assert_eq!(parse_all_tasks(&format!("[{TASK}]")).unwrap().len(), 1);

        let err = parse_all_events(&format!("[{EVENT},{TASK}]")).unwrap_err();
        assert!(matches!(err, JscalError::AtIndex { index: 1, .. }));
    }

    #[test]
    fn test_serialize_is_untagged() {
        let object = parse(EVENT).unwrap();
        let value: Value = serde_json::from_str(&object.to_json().unwrap()).unwrap();
        assert_eq!(value["@type"], "Event");
        assert_eq!(value["title"], "Lunch");
    }
}
