//! Nested JSCalendar entities shared by events, tasks and groups.

pub mod alert;
pub mod enums;
pub mod link;
pub mod location;
pub mod participant;
pub mod patch;
pub mod recurrence;
pub mod timezone;

pub use alert::{Alert, OffsetTrigger, Relation};
pub use enums::*;
pub use link::Link;
pub use location::{Location, VirtualLocation};
pub use participant::Participant;
pub use patch::{PatchObject, PatchValue};
pub use recurrence::{NDay, RecurrenceRule};
pub use timezone::{TimeZone, TimeZoneRule};
