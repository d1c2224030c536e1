//! Error types for the jscal crate.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// A literal that could not be decoded into one of the value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid LocalDateTime format: {0}")]
    LocalDateTime(String),

    #[error("invalid duration format: {0}")]
    Duration(String),

    #[error("duration out of range: {0}")]
    DurationOverflow(String),

    #[error("invalid day: {0}")]
    InvalidDay(String),

    #[error("invalid recurrence rule: {0}")]
    RecurrenceRule(String),
}

/// Failure to turn one iCalendar component into a JSCalendar object, or back.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("VEVENT is missing required UID property")]
    MissingUid,

    #[error("no VEVENT found in calendar")]
    NoEvents,

    #[error("expected exactly one VEVENT, found {0}")]
    MultipleEvents(usize),

    #[error("nothing to export")]
    NothingToExport,

    #[error("ICS parse error: {0}")]
    Ics(String),
}

/// Errors that can occur in jscal operations.
#[derive(Error, Debug)]
pub enum JscalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing or invalid @type field")]
    MissingType,

    #[error("unknown @type: {0}")]
    UnknownType(String),

    #[error("expected @type {expected}, got {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("object at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<JscalError>,
    },

    #[error("{0} is not set")]
    MissingField(&'static str),

    #[error("group entries must be Event or Task, got {0}")]
    InvalidEntryType(&'static str),

    #[error("duplicate UID '{0}' in group entries")]
    DuplicateEntry(String),

    #[error("no entry with UID '{0}' in group")]
    EntryNotFound(String),
}

impl From<config::ConfigError> for JscalError {
    fn from(err: config::ConfigError) -> Self {
        JscalError::Config(err.to_string())
    }
}

/// Result type alias for jscal operations.
pub type JscalResult<T> = Result<T, JscalError>;
