//! Validators for nested entities. Paths are relative to the entity.

use super::ValidationErrors;
use super::rules::{
    check_duration, check_enum, check_range, check_time_zone, check_type, is_absolute_uri,
};
use crate::model::{
    Alert, AlertAction, CalendarScale, Frequency, Link, Location, Participant, ParticipantKind,
    ParticipantRole, ParticipationStatus, Progress, RecurrenceRule, RelativeTo, ScheduleAgent, Skip,
    VirtualLocation, Weekday, is_known,
};

pub(super) fn validate_participant(participant: &Participant) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(email) = participant.email.as_deref() {
        if !email.is_empty() && !email.contains('@') {
            errors.push("email", "invalid email format");
        }
    }
    check_enum::<ParticipationStatus>(
        &mut errors,
        "participationStatus",
        participant.participation_status.as_deref(),
        "invalid participationStatus",
    );
    check_enum::<ScheduleAgent>(
        &mut errors,
        "scheduleAgent",
        participant.schedule_agent.as_deref(),
        "invalid scheduleAgent",
    );
    check_enum::<ParticipantKind>(&mut errors, "kind", participant.kind.as_deref(), "invalid kind");

    for role in participant.roles.keys() {
        if !is_known::<ParticipantRole>(role) {
            errors.push(format!("roles[{role}]"), "invalid role");
        }
    }

    check_enum::<Progress>(
        &mut errors,
        "progress",
        participant.progress.as_deref(),
        "invalid progress value",
    );
    check_range(&mut errors, "percentComplete", participant.percent_complete, 0, 100);

    for (id, link) in &participant.links {
        errors.extend_prefixed(&format!("links[{id}]"), validate_link(link));
    }

    errors
}

pub(super) fn validate_location(location: &Location) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(coordinates) = location.coordinates.as_deref() {
        if !coordinates.starts_with("geo:") {
            errors.push("coordinates", "must be a geo: URI");
        }
    }
    check_enum::<RelativeTo>(
        &mut errors,
        "relativeTo",
        location.relative_to.as_deref(),
        "invalid relativeTo",
    );
    check_time_zone(
        &mut errors,
        "timeZone",
        location.time_zone.as_deref().filter(|tz| !tz.is_empty()),
    );

    for (id, link) in &location.links {
        errors.extend_prefixed(&format!("links[{id}]"), validate_link(link));
    }

    errors
}

pub(super) fn validate_virtual_location(location: &VirtualLocation) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &location.object_type, "VirtualLocation");
    if location.uri.is_empty() {
        errors.push("uri", "is required");
    } else if !is_absolute_uri(&location.uri) {
        errors.push("uri", "invalid URI format");
    }

    // Feature names are extensible; only the set-style `true` values are enforced
    for (feature, enabled) in &location.features {
        if !enabled {
            errors.push(format!("features[{feature}]"), "feature value must be true");
        }
    }

    errors
}

pub(super) fn validate_alert(alert: &Alert) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &alert.object_type, "Alert");

    match &alert.trigger {
        None => errors.push("trigger", "is required"),
        Some(trigger) => {
            if trigger.object_type != "OffsetTrigger" {
                errors.push("trigger.@type", "must be 'OffsetTrigger'");
            }
            if trigger.offset.is_empty() {
                errors.push("trigger", "must have either offset or when");
            } else {
                check_duration(&mut errors, "trigger.offset", Some(&trigger.offset));
            }
            check_enum::<RelativeTo>(
                &mut errors,
                "trigger.relativeTo",
                trigger.relative_to.as_deref(),
                "invalid relativeTo",
            );
        }
    }

    check_enum::<AlertAction>(&mut errors, "action", alert.action.as_deref(), "invalid action");

    errors
}

pub(super) fn validate_link(link: &Link) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if link.href.is_empty() {
        errors.push("href", "is required");
    } else if !is_absolute_uri(&link.href) {
        errors.push("href", "invalid URL format");
    }
    if link.size.is_some_and(|size| size < 0) {
        errors.push("size", "cannot be negative");
    }

    errors
}

/// Inclusive bounds for the numeric by-unit filters. `signed` filters also
/// accept the negated range (counting from the end of the period).
const BY_UNIT_BOUNDS: [(&str, i64, i64, bool); 6] = [
    ("byMonthDay", 1, 31, true),
    ("byYearDay", 1, 366, true),
    ("byWeekNo", 1, 53, true),
    ("byHour", 0, 23, false),
    ("byMinute", 0, 59, false),
    ("bySecond", 0, 60, false),
];

fn by_unit_values<'a>(rule: &'a RecurrenceRule, field: &str) -> &'a [i64] {
    match field {
        "byMonthDay" => &rule.by_month_day,
        "byYearDay" => &rule.by_year_day,
        "byWeekNo" => &rule.by_week_no,
        "byHour" => &rule.by_hour,
        "byMinute" => &rule.by_minute,
        "bySecond" => &rule.by_second,
        _ => &[],
    }
}

pub(super) fn validate_recurrence_rule(rule: &RecurrenceRule) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_type(&mut errors, &rule.object_type, "RecurrenceRule");

    if rule.frequency.is_empty() {
        errors.push("frequency", "is required");
    } else if !is_known::<Frequency>(&rule.frequency) {
        errors.push("frequency", "invalid frequency");
    }

    if rule.interval.is_some_and(|i| i < 1) {
        errors.push("interval", "must be positive");
    }
    if rule.count.is_some_and(|c| c < 1) {
        errors.push("count", "must be positive");
    }
    if rule.count.is_some() && rule.until.is_some() {
        errors.push("", "cannot have both count and until");
    }

    check_enum::<CalendarScale>(
        &mut errors,
        "rscale",
        rule.rscale.as_deref().filter(|s| !s.is_empty()),
        "invalid rscale",
    );
    check_enum::<Skip>(
        &mut errors,
        "skip",
        rule.skip.as_deref().filter(|s| !s.is_empty()),
        "invalid skip",
    );

    if rule.first_day_of_week.is_some_and(|d| !(0..=6).contains(&d)) {
        errors.push("firstDayOfWeek", "invalid firstDayOfWeek");
    }

    for (i, nday) in rule.by_day.iter().enumerate() {
        if !is_known::<Weekday>(&nday.day) {
            errors.push(format!("byDay[{i}].day"), "invalid day");
        }
        if nday.nth_of_period == Some(0) {
            errors.push(format!("byDay[{i}].nthOfPeriod"), "cannot be zero");
        }
    }

    for (field, min, max, signed) in BY_UNIT_BOUNDS {
        for (i, value) in by_unit_values(rule, field).iter().enumerate() {
            let magnitude = if signed { value.abs() } else { *value };
            if magnitude < min || magnitude > max {
                errors.push(format!("{field}[{i}]"), "out of range");
            }
        }
    }
    for (i, value) in rule.by_set_pos.iter().enumerate() {
        if *value == 0 {
            errors.push(format!("bySetPos[{i}]"), "cannot be zero");
        }
    }

    errors
}
