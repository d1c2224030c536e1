//! Schema validation.
//!
//! Validators walk an object graph and collect every violation instead of
//! stopping at the first one. Each nested validator reports paths relative
//! to the value it was handed; the caller splices them in under a prefix
//! such as `participants[bob@example.com]` or `entries[2]`.

mod entities;
mod objects;
mod rules;

use std::fmt;

pub use objects::{validate_event, validate_group, validate_task};

pub const MAX_UID_LENGTH: usize = 255;
pub const MAX_TITLE_LENGTH: usize = 1024;
pub const MAX_DESCRIPTION_LENGTH: usize = 32768;

/// One violation: where it is and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Every violation found in one object, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    /// Appends `nested` with every path placed under `prefix`.
    pub fn extend_prefixed(&mut self, prefix: &str, nested: ValidationErrors) {
        self.0.extend(nested.0.into_iter().map(|err| ValidationError {
            field: join_path(prefix, &err.field),
            message: err.message,
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True if some violation sits at exactly `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field.is_empty()) {
        (true, _) => field.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}.{field}"),
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("no validation errors"),
            [only] => write!(f, "{only}"),
            all => {
                f.write_str("multiple validation errors: ")?;
                for (i, err) in all.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_splicing() {
        let mut nested = ValidationErrors::new();
        nested.push("roles[x]", "invalid role");
        nested.push("", "whole entry is wrong");

        let mut errors = ValidationErrors::new();
        errors.extend_prefixed("participants[bob@example.com]", nested);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["participants[bob@example.com].roles[x]", "participants[bob@example.com]"]
        );
    }

    #[test]
    fn test_display() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.to_string(), "no validation errors");

        errors.push("uid", "is required");
        assert_eq!(errors.to_string(), "uid: is required");

        errors.push("start", "is required");
        assert_eq!(
            errors.to_string(),
            "multiple validation errors: uid: is required; start: is required"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let err = ValidationErrors::from(ValidationError::new("event", "event is absent"));
        assert_eq!(err.clone().into_result(), Err(err));
    }
}
