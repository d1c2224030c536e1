//! Scalar checks shared by every validator.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::{MAX_UID_LENGTH, ValidationErrors};
use crate::duration::Duration;
use crate::model::is_known;

static TIME_ZONE_REGEX: OnceLock<Regex> = OnceLock::new();
static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

const TIME_ZONE_RE: &str = r"^[A-Za-z0-9/_+-]+$";
const COLOR_RE: &str = r"^(?:#[0-9a-fA-F]{3,8}|rgb\(|rgba\(|hsl\(|hsla\(|[a-zA-Z]+)";

pub(super) fn check_type(errors: &mut ValidationErrors, found: &str, expected: &str) {
    if found != expected {
        errors.push("@type", format!("must be '{expected}'"));
    }
}

pub(super) fn check_uid(errors: &mut ValidationErrors, uid: &str) {
    if uid.is_empty() {
        errors.push("uid", "is required");
    } else {
        check_max_length(errors, "uid", Some(uid), MAX_UID_LENGTH);
    }
}

/// Lengths count characters, not bytes.
pub(super) fn check_max_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if value.is_some_and(|v| v.chars().count() > max) {
        errors.push(field, format!("exceeds maximum length of {max} characters"));
    }
}

pub(super) fn check_duration(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if value.is_some_and(|v| Duration::parse(v).is_err()) {
        errors.push(field, "invalid ISO 8601 duration format");
    }
}

pub(super) fn is_time_zone_id(value: &str) -> bool {
    TIME_ZONE_REGEX
        .get_or_init(|| Regex::new(TIME_ZONE_RE).unwrap())
        .is_match(value)
}

pub(super) fn check_time_zone(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if value.is_some_and(|v| !is_time_zone_id(v)) {
        errors.push(field, "invalid IANA timezone identifier");
    }
}

pub(super) fn check_color(errors: &mut ValidationErrors, value: Option<&str>) {
    let pattern = COLOR_REGEX.get_or_init(|| Regex::new(COLOR_RE).unwrap());
    if value.is_some_and(|v| !pattern.is_match(v)) {
        errors.push("color", "invalid CSS color value");
    }
}

/// Flags `value` unless it is one of `E`'s canonical spellings.
pub(super) fn check_enum<E: FromStr>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) {
    if value.is_some_and(|v| !is_known::<E>(v)) {
        errors.push(field, message);
    }
}

pub(super) fn check_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) {
    if value.is_some_and(|v| v < min || v > max) {
        errors.push(field, format!("must be between {min} and {max}"));
    }
}

pub(super) fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: Option<i64>) {
    if value.is_some_and(|v| v < 0) {
        errors.push(field, "cannot be negative");
    }
}

pub(super) fn is_absolute_uri(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}
