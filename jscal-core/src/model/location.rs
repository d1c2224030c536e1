use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::link::Link;
use super::patch::PatchObject;

/// A physical place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub location_types: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// A `geo:` URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object_type: Some("Location".to_string()),
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// An online meeting place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualLocation {
    #[serde(rename = "@type", default)]
    pub object_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub uri: String,
    /// audio, chat, feed, moderator, phone, screen, video
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, bool>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl VirtualLocation {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            object_type: "VirtualLocation".to_string(),
            name: Some(name.into()),
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn add_feature(&mut self, feature: impl Into<String>) {
        self.features.insert(feature.into(), true);
    }
}
