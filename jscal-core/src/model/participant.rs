use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ParticipantRole, ParticipationStatus};
use super::link::Link;
use super::patch::PatchObject;

/// Someone (or something) taking part in an event or task.
///
/// Participants are keyed by an id in their parent's `participants` map;
/// the iCalendar bridge uses the email address as that id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participation_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect_reply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_force_send: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_sequence: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule_status: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub delegated_to: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub delegated_from: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub member_of: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<i64>,

    #[serde(flatten)]
    pub extensions: PatchObject,
}

impl Participant {
    /// A participant with the `attendee` role.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let mut participant = Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Default::default()
        };
        participant.add_role(ParticipantRole::Attendee);
        participant
    }

    pub fn add_role(&mut self, role: ParticipantRole) {
        self.roles.insert(role.as_ref().to_string(), true);
    }

    pub fn has_role(&self, role: ParticipantRole) -> bool {
        self.roles.get(role.as_ref()).copied().unwrap_or(false)
    }

    pub fn set_participation_status(&mut self, status: ParticipationStatus) {
        self.participation_status = Some(status.as_ref().to_string());
    }

    /// The known roles this participant holds, in a fixed order.
    pub fn known_roles(&self) -> Vec<ParticipantRole> {
        let mut roles: Vec<ParticipantRole> = self
            .roles
            .iter()
            .filter(|(_, held)| **held)
            .filter_map(|(role, _)| role.parse().ok())
            .collect();
        roles.sort();
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_is_attendee() {
        let p = Participant::new("Alice", "alice@example.com");
        assert!(p.has_role(ParticipantRole::Attendee));
        assert!(!p.has_role(ParticipantRole::Owner));
        assert_eq!(p.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_known_roles_skips_unknown_and_false() {
        let mut p = Participant::default();
        p.roles.insert("chair".into(), true);
        p.roles.insert("owner".into(), true);
        p.roles.insert("made-up".into(), true);
        p.roles.insert("optional".into(), false);
        assert_eq!(
            p.known_roles(),
            vec![ParticipantRole::Owner, ParticipantRole::Chair]
        );
    }

    #[test]
    fn test_json_shape() {
        let mut p = Participant::new("Bob", "bob@example.com");
        p.set_participation_status(ParticipationStatus::NeedsAction);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["participationStatus"], "needs-action");
        assert_eq!(json["roles"]["attendee"], true);
        assert!(json.get("delegatedTo").is_none());
    }
}
