//! Validation through the JSON entry points.

use jscal_core::{
    Event, Group, JscalError, ValidationErrors, parse, parse_all, parse_event, parse_task,
    validate_event,
};

fn violations(err: JscalError) -> ValidationErrors {
    match err {
        JscalError::Validation(errors) => errors,
        JscalError::AtIndex { source, .. } => violations(*source),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn absent_event_is_reported() {
    let errors = validate_event(None).unwrap_err();
    let first = errors.first().unwrap();
    assert_eq!(first.field, "event");
    assert_eq!(first.message, "event is absent");
}

#[test]
fn empty_uid_is_flagged_at_uid() {
    let mut event = Event::new("", "Untitled");
    event.start = Some("2025-01-01T00:00:00".parse().unwrap());
    let errors = validate_event(Some(&event)).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has_field("uid"));
}

#[test]
fn count_and_until_together_are_rejected() {
    let json = r#"{
        "@type": "Event",
        "uid": "r1",
        "start": "2025-03-03T09:00:00",
        "recurrenceRules": [{
            "@type": "RecurrenceRule",
            "frequency": "weekly",
            "count": 10,
            "until": "2025-06-01T00:00:00"
        }]
    }"#;

    let errors = violations(parse_event(json).unwrap_err());
    assert_eq!(
        errors.to_string(),
        "recurrenceRules[0]: cannot have both count and until"
    );
}

#[test]
fn nested_paths_are_reported() {
    let json = r#"{
        "@type": "Event",
        "uid": "n1",
        "start": "2025-03-03T09:00:00",
        "participants": {
            "bob@x": {"name": "Bob", "roles": {"attendee": true, "invalid-role": true}}
        },
        "locations": {
            "1": {"@type": "Location", "name": "HQ", "links": {"a": {"href": "nope"}}}
        },
        "recurrenceRules": [{
            "@type": "RecurrenceRule",
            "frequency": "weekly",
            "byDay": [{"day": "mo"}, {"day": "xx"}]
        }]
    }"#;

    let errors = violations(parse_event(json).unwrap_err());
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "participants[bob@x].roles[invalid-role]",
            "locations[1].links[a].href",
            "recurrenceRules[0].byDay[1].day",
        ]
    );
}

#[test]
fn task_due_before_start() {
    let json = r#"{
        "@type": "Task",
        "uid": "t1",
        "start": "2025-03-20T09:00:00",
        "due": "2025-03-19T09:00:00"
    }"#;

    let errors = violations(parse_task(json).unwrap_err());
    assert_eq!(errors.to_string(), "due: due date cannot be before start date");
}

#[test]
fn group_cannot_contain_itself() {
    let json = r#"{
        "@type": "Group",
        "uid": "g1",
        "entries": [
            {"@type": "Task", "uid": "g1", "title": "Me again"}
        ]
    }"#;

    let errors = violations(parse(json).unwrap_err());
    assert_eq!(errors.to_string(), "entries[0]: group cannot contain itself");

    let group = Group::new("g2", "Fine");
    assert!(group.validate().is_ok());
}

#[test]
fn batch_errors_carry_the_index() {
    let json = r#"[
        {"@type": "Task", "uid": "ok"},
        {"@type": "Event", "uid": "missing-start"}
    ]"#;

    match parse_all(json).unwrap_err() {
        JscalError::AtIndex { index, source } => {
            assert_eq!(index, 1);
            assert!(violations(*source).has_field("start"));
        }
        other => panic!("expected AtIndex, got {other:?}"),
    }
}
