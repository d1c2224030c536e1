//! Free-form JSON content: patch documents and unknown properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A patch document: JSON pointer-ish keys mapped to replacement values.
pub type PatchObject = BTreeMap<String, PatchValue>;

/// Any JSON value.
///
/// Used for `recurrenceOverrides`, `localizations` and for properties this
/// crate does not model, which are kept so they survive a decode/encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<PatchValue>),
    Object(BTreeMap<String, PatchValue>),
}

impl PatchValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PatchValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PatchValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PatchValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, PatchValue>> {
        match self {
            PatchValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for PatchValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PatchValue::Null,
            serde_json::Value::Bool(b) => PatchValue::Bool(b),
            serde_json::Value::Number(n) => PatchValue::Number(n),
            serde_json::Value::String(s) => PatchValue::String(s),
            serde_json::Value::Array(items) => {
                PatchValue::Array(items.into_iter().map(PatchValue::from).collect())
            }
            serde_json::Value::Object(map) => PatchValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, PatchValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<PatchValue> for serde_json::Value {
    fn from(value: PatchValue) -> Self {
        match value {
            PatchValue::Null => serde_json::Value::Null,
            PatchValue::Bool(b) => serde_json::Value::Bool(b),
            PatchValue::Number(n) => serde_json::Value::Number(n),
            PatchValue::String(s) => serde_json::Value::String(s),
            PatchValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            PatchValue::Object(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for PatchValue {
    fn from(s: &str) -> Self {
        PatchValue::String(s.to_string())
    }
}

impl From<bool> for PatchValue {
    fn from(b: bool) -> Self {
        PatchValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_nested_patch() {
        let patch: PatchObject = serde_json::from_value(json!({
            "title": "Moved",
            "excluded": true,
            "priority": 3,
            "locations/1/name": null,
            "keywords": { "a": true },
            "list": [1, "two"]
        }))
        .unwrap();

        assert_eq!(patch["title"].as_str(), Some("Moved"));
        assert_eq!(patch["excluded"].as_bool(), Some(true));
        assert!(matches!(patch["priority"], PatchValue::Number(_)));
        assert!(patch["locations/1/name"].is_null());
        assert_eq!(
            patch["keywords"].as_object().unwrap()["a"],
            PatchValue::Bool(true)
        );
        assert!(matches!(&patch["list"], PatchValue::Array(items) if items.len() == 2));
    }

    #[test]
    fn test_value_conversion_is_lossless() {
        let original = json!({"a": [null, 1.5, {"b": "c"}], "d": false});
        let patch = PatchValue::from(original.clone());
        assert_eq!(serde_json::Value::from(patch.clone()), original);
        assert_eq!(serde_json::to_value(&patch).unwrap(), original);
    }
}
