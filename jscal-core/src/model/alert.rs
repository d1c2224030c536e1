use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AlertAction, RelativeTo};
use super::patch::PatchObject;
use crate::duration::Duration;

/// A reminder attached to an event or task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<OffsetTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub related_to: BTreeMap<String, Relation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Alert {
    /// A display alert firing `offset` relative to the start.
    pub fn display(offset: Duration) -> Self {
        Self {
            object_type: "Alert".to_string(),
            trigger: Some(OffsetTrigger::new(offset)),
            action: Some(AlertAction::Display.as_ref().to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetTrigger {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    /// ISO 8601 duration; negative fires before the anchor
    #[serde(default)]
    pub offset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
}

impl OffsetTrigger {
    pub fn new(offset: Duration) -> Self {
        Self {
            object_type: "OffsetTrigger".to_string(),
            offset: offset.to_string(),
            relative_to: None,
        }
    }

    pub fn relative_to(mut self, anchor: RelativeTo) -> Self {
        self.relative_to = Some(anchor.as_ref().to_string());
        self
    }
}

/// How this object relates to another one (first, next, child, parent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relation: BTreeMap<String, bool>,
}
