//! Validators for the top-level objects.

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::entities::{
    validate_alert, validate_link, validate_location, validate_participant,
    validate_recurrence_rule, validate_virtual_location,
};
use super::rules::{
    check_color, check_duration, check_enum, check_max_length, check_non_negative, check_range,
    check_time_zone, check_type, check_uid,
};
use super::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, ValidationErrors};
use crate::event::Event;
use crate::group::Group;
use crate::model::{
    Alert, DescriptionContentType, EventStatus, FreeBusyStatus, Link, Location, Method,
    Participant, Privacy, Progress, RecurrenceRule, TaskStatus, VirtualLocation,
};
use crate::object::CalendarObject;
use crate::task::Task;

/// The properties events and tasks have in common.
struct Common<'a> {
    uid: &'a str,
    sequence: Option<i64>,
    method: Option<&'a str>,
    title: Option<&'a str>,
    description: Option<&'a str>,
    description_content_type: Option<&'a str>,
    color: Option<&'a str>,
    time_zone: Option<&'a str>,
    priority: Option<i64>,
    free_busy_status: Option<&'a str>,
    privacy: Option<&'a str>,
    participants: &'a BTreeMap<String, Participant>,
    locations: &'a BTreeMap<String, Location>,
    virtual_locations: &'a BTreeMap<String, VirtualLocation>,
    alerts: &'a BTreeMap<String, Alert>,
    links: &'a BTreeMap<String, Link>,
    recurrence_rules: &'a [RecurrenceRule],
    excluded_recurrence_rules: &'a [RecurrenceRule],
}

macro_rules! common_fields {
    ($obj:expr) => {
        Common {
            uid: &$obj.uid,
            sequence: $obj.sequence,
            method: $obj.method.as_deref(),
            title: $obj.title.as_deref(),
            description: $obj.description.as_deref(),
            description_content_type: $obj.description_content_type.as_deref(),
            color: $obj.color.as_deref(),
            time_zone: $obj.time_zone.as_deref(),
            priority: $obj.priority,
            free_busy_status: $obj.free_busy_status.as_deref(),
            privacy: $obj.privacy.as_deref(),
            participants: &$obj.participants,
            locations: &$obj.locations,
            virtual_locations: &$obj.virtual_locations,
            alerts: &$obj.alerts,
            links: &$obj.links,
            recurrence_rules: &$obj.recurrence_rules,
            excluded_recurrence_rules: &$obj.excluded_recurrence_rules,
        }
    };
}

fn check_common_scalars(errors: &mut ValidationErrors, common: &Common<'_>) {
    check_max_length(errors, "title", common.title, MAX_TITLE_LENGTH);
    check_max_length(errors, "description", common.description, MAX_DESCRIPTION_LENGTH);
    check_time_zone(errors, "timeZone", common.time_zone);
    check_color(errors, common.color);
    check_enum::<FreeBusyStatus>(
        errors,
        "freeBusyStatus",
        common.free_busy_status,
        "invalid freeBusyStatus",
    );
    check_enum::<Privacy>(errors, "privacy", common.privacy, "invalid privacy");
    check_range(errors, "priority", common.priority, 0, 9);
    check_enum::<Method>(errors, "method", common.method, "invalid method value");
    check_enum::<DescriptionContentType>(
        errors,
        "descriptionContentType",
        common.description_content_type,
        "must be text/plain or text/html",
    );
    check_non_negative(errors, "sequence", common.sequence);
}

fn check_common_collections(errors: &mut ValidationErrors, common: &Common<'_>) {
    for (id, participant) in common.participants {
        errors.extend_prefixed(&format!("participants[{id}]"), validate_participant(participant));
    }
    for (id, location) in common.locations {
        errors.extend_prefixed(&format!("locations[{id}]"), validate_location(location));
    }
    for (id, location) in common.virtual_locations {
        errors.extend_prefixed(
            &format!("virtualLocations[{id}]"),
            validate_virtual_location(location),
        );
    }
    for (id, alert) in common.alerts {
        errors.extend_prefixed(&format!("alerts[{id}]"), validate_alert(alert));
    }
    for (id, link) in common.links {
        errors.extend_prefixed(&format!("links[{id}]"), validate_link(link));
    }
    for (i, rule) in common.recurrence_rules.iter().enumerate() {
        errors.extend_prefixed(&format!("recurrenceRules[{i}]"), validate_recurrence_rule(rule));
    }
    for (i, rule) in common.excluded_recurrence_rules.iter().enumerate() {
        errors.extend_prefixed(
            &format!("excludedRecurrenceRules[{i}]"),
            validate_recurrence_rule(rule),
        );
    }
}

fn absent(kind: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.push(kind, format!("{kind} is absent"));
    errors
}

fn finish(kind: &str, uid: &str, errors: ValidationErrors) -> Result<(), ValidationErrors> {
    trace!(kind, uid, violations = errors.len(), "validated");
    errors.into_result()
}

fn event_errors(event: &Event) -> ValidationErrors {
    let common = common_fields!(event);
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &event.object_type, "Event");
    check_uid(&mut errors, &event.uid);
    if event.start.is_none() {
        errors.push("start", "is required");
    }
    check_duration(&mut errors, "duration", event.duration.as_deref());
    check_enum::<EventStatus>(&mut errors, "status", event.status.as_deref(), "invalid status");
    check_common_scalars(&mut errors, &common);
    check_common_collections(&mut errors, &common);

    errors
}

fn task_errors(task: &Task) -> ValidationErrors {
    let common = common_fields!(task);
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &task.object_type, "Task");
    check_uid(&mut errors, &task.uid);
    check_enum::<Progress>(
        &mut errors,
        "progress",
        task.progress.as_deref(),
        "invalid progress value",
    );
    check_range(&mut errors, "percentComplete", task.percent_complete, 0, 100);
    check_duration(&mut errors, "estimatedDuration", task.estimated_duration.as_deref());
    if let (Some(start), Some(due)) = (task.start, task.due) {
        if due < start {
            errors.push("due", "due date cannot be before start date");
        }
    }
    check_enum::<TaskStatus>(&mut errors, "status", task.status.as_deref(), "invalid status");
    check_common_scalars(&mut errors, &common);
    check_common_collections(&mut errors, &common);

    errors
}

fn group_errors(group: &Group) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &group.object_type, "Group");
    check_uid(&mut errors, &group.uid);
    check_max_length(&mut errors, "title", group.title.as_deref(), MAX_TITLE_LENGTH);
    check_max_length(
        &mut errors,
        "description",
        group.description.as_deref(),
        MAX_DESCRIPTION_LENGTH,
    );
    check_non_negative(&mut errors, "sequence", group.sequence);
    check_color(&mut errors, group.color.as_deref());
    check_enum::<Method>(&mut errors, "method", group.method.as_deref(), "invalid method value");

    for (id, link) in &group.links {
        errors.extend_prefixed(&format!("links[{id}]"), validate_link(link));
    }

    let mut seen = HashSet::new();
    for (i, entry) in group.entries.iter().enumerate() {
        let prefix = format!("entries[{i}]");
        let uid = entry.uid();

        if !seen.insert(uid) {
            errors.push(
                prefix.clone(),
                format!("duplicate UID '{uid}' in group entries"),
            );
        }
        if uid == group.uid {
            errors.push(prefix.clone(), "group cannot contain itself");
        }

        let nested = match entry {
            CalendarObject::Event(event) => event_errors(event),
            CalendarObject::Task(task) => task_errors(task),
            CalendarObject::Group(inner) => {
                errors.push(format!("{prefix}.@type"), "must be 'Event' or 'Task'");
                group_errors(inner)
            }
        };
        errors.extend_prefixed(&prefix, nested);
    }

    errors
}

/// Validates an event. `None` is reported as a single violation.
pub fn validate_event(event: Option<&Event>) -> Result<(), ValidationErrors> {
    match event {
        None => Err(absent("event")),
        Some(event) => finish("event", &event.uid, event_errors(event)),
    }
}

pub fn validate_task(task: Option<&Task>) -> Result<(), ValidationErrors> {
    match task {
        None => Err(absent("task")),
        Some(task) => finish("task", &task.uid, task_errors(task)),
    }
}

pub fn validate_group(group: Option<&Group>) -> Result<(), ValidationErrors> {
    match group {
        None => Err(absent("group")),
        Some(group) => finish("group", &group.uid, group_errors(group)),
    }
}
