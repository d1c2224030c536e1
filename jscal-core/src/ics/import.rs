//! VEVENT to JSCalendar event conversion.

use std::collections::BTreeMap;

use icalendar::parser::{Component, Property};
use tracing::{debug, warn};

use super::datetime::parse_date_time;
use super::rrule;
use super::text::split_list;
use crate::duration::Duration;
use crate::error::ConversionError;
use crate::event::Event;
use crate::local_datetime::LocalDateTime;
use crate::model::{Link, Location, Participant, ParticipantRole};

/// Converts one parsed VEVENT into an [`Event`].
///
/// Only a missing UID fails the conversion. Values that cannot be read are
/// left unset and logged.
pub fn import_event(vevent: &Component<'_>) -> Result<Event, ConversionError> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .filter(|uid| !uid.is_empty())
        .ok_or(ConversionError::MissingUid)?;

    let mut event = Event {
        object_type: "Event".to_string(),
        uid,
        ..Default::default()
    };

    event.title = vevent.find_prop("SUMMARY").map(|p| p.val.to_string());
    event.description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    import_start(vevent, &mut event);
    import_duration(vevent, &mut event);

    event.created = find_utc(vevent, "CREATED", &event.uid);
    event.updated = find_utc(vevent, "LAST-MODIFIED", &event.uid);
    event.sequence = vevent
        .find_prop("SEQUENCE")
        .and_then(|p| p.val.as_ref().trim().parse::<i64>().ok())
        .filter(|seq| *seq >= 0);

    event.status = vevent
        .find_prop("STATUS")
        .map(|p| p.val.as_ref().to_lowercase());

    event.categories = vevent
        .properties
        .iter()
        .filter(|p| p.name == "CATEGORIES")
        .flat_map(|p| split_list(p.val.as_ref()))
        .map(|c| (c, true))
        .collect();

    if let Some(location) = vevent.find_prop("LOCATION") {
        event.add_location("1", Location::new(location.val.as_ref()));
    }

    event.free_busy_status = vevent.find_prop("TRANSP").map(|p| {
        if p.val.as_ref().eq_ignore_ascii_case("TRANSPARENT") {
            "free".to_string()
        } else {
            "busy".to_string()
        }
    });

    event.privacy = vevent.find_prop("CLASS").map(|p| {
        match p.val.as_ref().to_lowercase().as_str() {
            "confidential" => "private".to_string(),
            other => other.to_string(),
        }
    });

    if let Some(url) = vevent.find_prop("URL") {
        event.add_link("1", Link::new(url.val.as_ref()));
    }

    event.participants = import_participants(vevent);

    if let Some(prop) = vevent.find_prop("RRULE") {
        match rrule::parse(prop.val.as_ref()) {
            Ok(rule) => event.recurrence_rules.push(rule),
            Err(err) => warn!(uid = %event.uid, %err, "dropping unreadable RRULE"),
        }
    }

    debug!(
        uid = %event.uid,
        participants = event.participants.len(),
        recurring = event.is_recurring(),
        "imported VEVENT"
    );
    Ok(event)
}

fn import_start(vevent: &Component<'_>, event: &mut Event) {
    let Some(prop) = vevent.find_prop("DTSTART") else {
        return;
    };
    let Some(start) = parse_date_time(prop.val.as_ref()) else {
        warn!(uid = %event.uid, value = %prop.val, "unreadable DTSTART, leaving start unset");
        return;
    };

    event.start = Some(LocalDateTime::from_naive(start.value));
    if start.is_date || param(prop, "VALUE") == Some("DATE") {
        event.show_without_time = Some(true);
    }
    if !start.is_utc {
        event.time_zone = param(prop, "TZID")
            .filter(|tz| *tz != "UTC")
            .map(str::to_string);
    }
}

/// DTEND takes precedence over DURATION, as in RFC 5545 only one may appear.
fn import_duration(vevent: &Component<'_>, event: &mut Event) {
    if let Some(prop) = vevent.find_prop("DTEND") {
        match (event.start, parse_date_time(prop.val.as_ref())) {
            (Some(start), Some(end)) => {
                let end = LocalDateTime::from_naive(end.value);
                event.duration = Some(Duration::between(&start, &end).to_string());
            }
            (_, None) => {
                warn!(uid = %event.uid, value = %prop.val, "unreadable DTEND, leaving duration unset")
            }
            (None, Some(_)) => {}
        }
    } else if let Some(prop) = vevent.find_prop("DURATION") {
        match Duration::parse(prop.val.as_ref().trim()) {
            Ok(duration) => event.duration = Some(duration.to_string()),
            Err(err) => warn!(uid = %event.uid, %err, "unreadable DURATION, leaving duration unset"),
        }
    }
}

fn find_utc(
    vevent: &Component<'_>,
    name: &str,
    uid: &str,
) -> Option<chrono::DateTime<chrono::Utc>> {
    let prop = vevent.find_prop(name)?;
    match parse_date_time(prop.val.as_ref()) {
        Some(dt) => Some(dt.value.and_utc()),
        None => {
            warn!(uid, property = name, value = %prop.val, "unreadable timestamp");
            None
        }
    }
}

/// ORGANIZER and ATTENDEE lines keyed by address, with roles accumulated.
fn import_participants(vevent: &Component<'_>) -> BTreeMap<String, Participant> {
    let mut participants = BTreeMap::new();

    if let Some(organizer) = vevent.find_prop("ORGANIZER") {
        let email = address(organizer);
        let participant = participants
            .entry(email.clone())
            .or_insert_with(|| blank_participant(email));
        participant.add_role(ParticipantRole::Owner);
        participant.add_role(ParticipantRole::Attendee);
        if let Some(name) = param(organizer, "CN") {
            participant.name = Some(name.to_string());
        }
    }

    for attendee in vevent.properties.iter().filter(|p| p.name == "ATTENDEE") {
        let email = address(attendee);
        let participant = participants.entry(email.clone()).or_insert_with(|| {
            let mut participant = blank_participant(email);
            participant.add_role(ParticipantRole::Attendee);
            participant
        });

        if let Some(name) = param(attendee, "CN") {
            participant.name = Some(name.to_string());
        }
        if let Some(partstat) = param(attendee, "PARTSTAT") {
            participant.participation_status = Some(partstat.to_lowercase());
        }
        if let Some(role) = param(attendee, "ROLE") {
            for role in roles_for(role) {
                participant.add_role(*role);
            }
        }
    }

    participants
}

fn roles_for(ics_role: &str) -> &'static [ParticipantRole] {
    match ics_role.to_ascii_uppercase().as_str() {
        "CHAIR" => &[ParticipantRole::Chair, ParticipantRole::Attendee],
        "OPT-PARTICIPANT" => &[ParticipantRole::Optional],
        "NON-PARTICIPANT" => &[ParticipantRole::Informational],
        _ => &[ParticipantRole::Attendee],
    }
}

fn blank_participant(email: String) -> Participant {
    Participant {
        email: Some(email),
        ..Default::default()
    }
}

fn address(prop: &Property<'_>) -> String {
    let value = prop.val.as_ref().trim();
    match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => value[7..].to_string(),
        _ => value.to_string(),
    }
}

fn param<'a>(prop: &'a Property<'_>, key: &str) -> Option<&'a str> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref())
        .map(|v| v.as_ref())
}
