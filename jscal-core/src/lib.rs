//! JSCalendar (RFC 8984) objects for Rust.
//!
//! This crate provides:
//! - `Event`, `Task` and `Group` with their nested entities, decoded from
//!   and encoded to JSON
//! - `LocalDateTime` and `Duration` codecs for the zone-less date-times and
//!   ISO 8601 durations the format uses
//! - a schema validator that reports every violation with its field path
//! - an `ics` bridge converting events to and from iCalendar (RFC 5545)

pub mod config;
pub mod duration;
pub mod error;
pub mod event;
pub mod group;
pub mod ics;
pub mod local_datetime;
pub mod model;
pub mod object;
pub mod task;
pub mod validate;

pub use crate::config::BridgeConfig;
pub use duration::Duration;
pub use error::{ConversionError, JscalError, JscalResult, ParseError};
pub use event::Event;
pub use group::Group;
pub use local_datetime::{LocalDateTime, OptionalLocalDateTime};
pub use object::{
    CalendarObject, parse, parse_all, parse_all_events, parse_all_groups, parse_all_tasks,
    parse_event, parse_group, parse_task,
};
pub use task::Task;
pub use validate::{ValidationError, ValidationErrors, validate_event, validate_group, validate_task};
