//! iCalendar (RFC 5545) bridge.
//!
//! Text is read with the `icalendar` crate's parser and written with its
//! builder. Conversions work one VEVENT at a time so that one bad component
//! does not sink the rest of a calendar.

mod datetime;
mod export;
mod import;
pub mod rrule;
mod text;

use icalendar::Calendar;
use icalendar::parser::{read_calendar, unfold};
use tracing::debug;

pub use export::export_event;
pub use import::import_event;

use text::preserve_list_escapes;

use crate::config::BridgeConfig;
use crate::error::ConversionError;
use crate::event::Event;

const DETECTION_PATTERNS: [&str; 5] = ["BEGIN:VEVENT", "DTSTART:", "DTEND:", "SUMMARY:", "UID:"];

/// Guess whether `data` is iCalendar text.
pub fn detect(data: &str) -> bool {
    let data = data.trim();
    if data.starts_with("BEGIN:VCALENDAR") {
        return true;
    }
    DETECTION_PATTERNS
        .iter()
        .filter(|p| data.contains(*p))
        .count()
        >= 3
}

/// Converts every VEVENT in `content`, one result per component.
///
/// Fails as a whole only when the text itself cannot be parsed.
pub fn import_calendar(content: &str) -> Result<Vec<Result<Event, ConversionError>>, ConversionError> {
    let unfolded = preserve_list_escapes(&unfold(content));
    let calendar = read_calendar(&unfolded).map_err(|e| ConversionError::Ics(e.to_string()))?;

    let results: Vec<_> = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(import_event)
        .collect();

    debug!(
        events = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
        "imported calendar"
    );
    Ok(results)
}

/// Converts a calendar that must hold exactly one VEVENT.
pub fn import_single(content: &str) -> Result<Event, ConversionError> {
    let mut results = import_calendar(content)?;
    match results.len() {
        0 => Err(ConversionError::NoEvents),
        1 => results.remove(0),
        n => Err(ConversionError::MultipleEvents(n)),
    }
}

/// Writes `events` as one VCALENDAR stamped with the configured PRODID.
pub fn export_calendar(events: &[Event], config: &BridgeConfig) -> Result<String, ConversionError> {
    if events.is_empty() {
        return Err(ConversionError::NothingToExport);
    }

    let mut cal = Calendar::new();
    for event in events {
        cal.push(export_event(event, config));
    }
    let cal = cal.done();

    Ok(rewrite_header(&cal.to_string(), &config.prod_id))
}

/// Replace the builder's PRODID and drop CALSCALE:GREGORIAN (the default).
fn rewrite_header(ics: &str, prod_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(prod_id);
            result.push_str("\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
