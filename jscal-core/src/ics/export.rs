//! JSCalendar event to VEVENT conversion.

use chrono::Utc;
use icalendar::{Component, EventLike, Property, ValueType};
use tracing::debug;

use super::datetime::{format_date, format_floating, format_utc};
use super::rrule;
use crate::config::BridgeConfig;
use crate::event::Event;
use crate::local_datetime::LocalDateTime;
use crate::model::{Participant, ParticipantRole};

/// Builds the VEVENT for `event`.
///
/// Only the first location and the first link survive, and DURATION is
/// written instead of DTEND.
pub fn export_event(event: &Event, config: &BridgeConfig) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);

    // DTSTAMP - required by RFC 5545, last change when known, else now
    let dtstamp = event
        .updated
        .filter(|_| config.stamp_from_updated)
        .unwrap_or_else(Utc::now);
    ics_event.add_property("DTSTAMP", format_utc(&dtstamp));

    // SUMMARY and DESCRIPTION - TEXT values, escaped by the builder
    if let Some(ref title) = event.title {
        ics_event.summary(title);
    }
    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(ref start) = event.start {
        add_start(&mut ics_event, event, start);
    }
    // DURATION - never DTEND, the event stores a length
    if let Some(duration) = event.duration.as_deref().filter(|d| !d.is_empty()) {
        ics_event.add_property("DURATION", duration);
    }

    if let Some(created) = event.created {
        ics_event.add_property("CREATED", format_utc(&created));
    }
    if let Some(updated) = event.updated {
        ics_event.add_property("LAST-MODIFIED", format_utc(&updated));
    }
    if let Some(seq) = event.sequence {
        ics_event.add_property("SEQUENCE", seq.to_string());
    }
    if let Some(ref status) = event.status {
        ics_event.add_property("STATUS", status.to_uppercase());
    }

    // CATEGORIES - one property per category so commas inside a name stay escaped
    for (name, _) in event.categories.iter().filter(|(_, on)| **on) {
        ics_event.append_multi_property(Property::new("CATEGORIES", name));
    }

    // LOCATION - only the first named location fits
    if let Some(name) = event.locations.values().find_map(|l| l.name.as_deref()) {
        ics_event.location(name);
    }

    // TRANSP - free time is transparent, everything else blocks
    if let Some(ref fbs) = event.free_busy_status {
        let transp = if fbs == "free" { "TRANSPARENT" } else { "OPAQUE" };
        ics_event.add_property("TRANSP", transp);
    }

    // CLASS - JSCalendar `private` hides details, which is CONFIDENTIAL in RFC 5545
    if let Some(ref privacy) = event.privacy {
        let class = match privacy.to_uppercase().as_str() {
            "PRIVATE" => "CONFIDENTIAL".to_string(),
            other => other.to_string(),
        };
        ics_event.add_property("CLASS", class);
    }

    // URL
    if let Some(link) = event.links.values().next() {
        ics_event.add_property("URL", &link.href);
    }

    add_participants(&mut ics_event, event);

    // RRULE - one per rule, unsupported parts already dropped by the formatter
    for rule in &event.recurrence_rules {
        let value = rrule::format(rule);
        if !value.is_empty() {
            ics_event.add_property("RRULE", value);
        }
    }

    debug!(uid = %event.uid, "exported VEVENT");
    ics_event.done()
}

/// DTSTART as a DATE for all-day events, with TZID when zoned, else floating.
fn add_start(ics_event: &mut icalendar::Event, event: &Event, start: &LocalDateTime) {
    if event.is_all_day() {
        let mut prop = Property::new("DTSTART", format_date(start));
        prop.append_parameter(ValueType::Date);
        ics_event.append_property(prop);
    } else if let Some(ref tzid) = event.time_zone {
        let mut prop = Property::new("DTSTART", format_floating(start));
        prop.add_parameter("TZID", tzid);
        ics_event.append_property(prop);
    } else {
        ics_event.add_property("DTSTART", format_floating(start));
    }
}

/// Every participant becomes an ATTENDEE. The first owner is also the ORGANIZER.
fn add_participants(ics_event: &mut icalendar::Event, event: &Event) {
    let mut has_organizer = false;

    for (id, participant) in &event.participants {
        let mailto = mailto(participant.email.as_deref().unwrap_or(id));

        // ORGANIZER - the first owner; clients expect exactly one
        if !has_organizer && participant.has_role(ParticipantRole::Owner) {
            let mut prop = Property::new("ORGANIZER", &mailto);
            if let Some(ref name) = participant.name {
                prop.add_parameter("CN", name);
            }
            ics_event.append_property(prop);
            has_organizer = true;
        }

        // ATTENDEE - everyone, owners included, so their PARTSTAT is kept
        let mut prop = Property::new("ATTENDEE", &mailto);
        if let Some(ref name) = participant.name {
            prop.add_parameter("CN", name);
        }
        if let Some(ref partstat) = participant.participation_status {
            prop.add_parameter("PARTSTAT", &partstat.to_uppercase());
        }
        if !participant.roles.is_empty() {
            prop.add_parameter("ROLE", ics_role(participant));
        }
        ics_event.append_multi_property(prop);
    }
}

fn ics_role(participant: &Participant) -> &'static str {
    if participant.has_role(ParticipantRole::Chair) {
        "CHAIR"
    } else if participant.has_role(ParticipantRole::Optional) {
        "OPT-PARTICIPANT"
    } else if participant.has_role(ParticipantRole::Informational) {
        "NON-PARTICIPANT"
    } else {
        "REQ-PARTICIPANT"
    }
}

fn mailto(address: &str) -> String {
    if address.get(..7).is_some_and(|s| s.eq_ignore_ascii_case("mailto:")) {
        address.to_string()
    } else {
        format!("mailto:{address}")
    }
}
