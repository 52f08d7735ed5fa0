//! Exchange group and participant records.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay};
use tracing::instrument;
use uuid::Uuid;

/// Unique identifier of an exchange group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for GroupId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier of a participant. Never reused, even after removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ParticipantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Assignment dimension of a group's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, AsRefStr)]
pub enum GroupStatus {
    /// Participants may still be added or removed.
    Draft,
    /// Pairs are drawn; participants and pairs are frozen.
    Assigned,
}

/// Details for a participant about to join a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct NewParticipant {
    name: String,
    contact_info: Option<String>,
    avatar_ref: Option<String>,
}

impl NewParticipant {
    /// Creates participant details with just a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_info: None,
            avatar_ref: None,
        }
    }

    /// Attaches contact information.
    pub fn with_contact_info(mut self, contact_info: impl Into<String>) -> Self {
        self.contact_info = Some(contact_info.into());
        self
    }

    /// Attaches an avatar reference (file name or URL).
    pub fn with_avatar_ref(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>, Option<String>) {
        (self.name, self.contact_info, self.avatar_ref)
    }
}

impl From<&str> for NewParticipant {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for NewParticipant {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

/// A member of an exchange group.
///
/// Only serialised, never deserialised: records are built by the registry or
/// restored by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    contact_info: Option<String>,
    avatar_ref: Option<String>,
    /// Who this participant gives to. Never their own id.
    assigned_recipient_id: Option<ParticipantId>,
    /// One-way latch set by the first reveal.
    revealed: bool,
}

impl Participant {
    /// Creates an unassigned, hidden participant with a fresh id.
    ///
    /// The name is taken as given; validation belongs to the registry.
    pub(crate) fn create(
        name: String,
        contact_info: Option<String>,
        avatar_ref: Option<String>,
    ) -> Self {
        Self {
            id: ParticipantId::generate(),
            name,
            contact_info,
            avatar_ref,
            assigned_recipient_id: None,
            revealed: false,
        }
    }

    /// Rebuilds a participant from stored fields.
    pub(crate) fn restore(
        id: ParticipantId,
        name: String,
        contact_info: Option<String>,
        avatar_ref: Option<String>,
        assigned_recipient_id: Option<ParticipantId>,
        revealed: bool,
    ) -> Self {
        Self {
            id,
            name,
            contact_info,
            avatar_ref,
            assigned_recipient_id,
            revealed,
        }
    }

    pub(crate) fn assign_to(&mut self, recipient: ParticipantId) {
        debug_assert_ne!(recipient, self.id, "participant assigned to themselves");
        self.assigned_recipient_id = Some(recipient);
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }
}

/// A named gift exchange and the participants it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct ExchangeGroup {
    id: GroupId,
    title: String,
    budget: f64,
    event_date: NaiveDate,
    rules: String,
    /// Participants in stable insertion order.
    participants: Vec<Participant>,
    assignment_generated: bool,
    created_at: NaiveDateTime,
}

impl ExchangeGroup {
    /// Creates an empty draft group with a fresh id.
    #[instrument(skip(title, rules))]
    pub(crate) fn create(
        title: String,
        budget: f64,
        event_date: NaiveDate,
        rules: String,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: GroupId::generate(),
            title,
            budget,
            event_date,
            rules,
            participants: Vec::new(),
            assignment_generated: false,
            created_at,
        }
    }

    /// Rebuilds a group from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: GroupId,
        title: String,
        budget: f64,
        event_date: NaiveDate,
        rules: String,
        participants: Vec<Participant>,
        assignment_generated: bool,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title,
            budget,
            event_date,
            rules,
            participants,
            assignment_generated,
            created_at,
        }
    }

    /// Returns where the group is in its lifecycle.
    pub fn status(&self) -> GroupStatus {
        if self.assignment_generated {
            GroupStatus::Assigned
        } else {
            GroupStatus::Draft
        }
    }

    /// Looks up a participant by id.
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == *id)
    }

    /// Returns participant ids in stored order.
    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// Number of participants who have seen their assignment.
    pub fn revealed_count(&self) -> usize {
        self.participants.iter().filter(|p| p.revealed).count()
    }

    pub(crate) fn participant_mut(&mut self, id: &ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == *id)
    }

    pub(crate) fn push_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    pub(crate) fn take_participant(&mut self, id: &ParticipantId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == *id)?;
        Some(self.participants.remove(index))
    }

    pub(crate) fn mark_assigned(&mut self) {
        self.assignment_generated = true;
    }
}

/// Overview of a group for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GroupSummary {
    id: GroupId,
    title: String,
    budget: f64,
    event_date: NaiveDate,
    participant_count: usize,
    revealed_count: usize,
    status: GroupStatus,
}

impl From<&ExchangeGroup> for GroupSummary {
    fn from(group: &ExchangeGroup) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            budget: group.budget,
            event_date: group.event_date,
            participant_count: group.participants.len(),
            revealed_count: group.revealed_count(),
            status: group.status(),
        }
    }
}

/// Details for creating a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct NewGroup {
    title: String,
    budget: f64,
    event_date: NaiveDate,
    rules: String,
    participant_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> ExchangeGroup {
        let date = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        ExchangeGroup::create(
            "Office".to_string(),
            25.0,
            date,
            String::new(),
            date.and_hms_opt(9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_group_is_draft() {
        let group = sample_group();
        assert_eq!(group.status(), GroupStatus::Draft);
        assert!(group.participants().is_empty());
    }

    #[test]
    fn test_take_participant_keeps_order() {
        let mut group = sample_group();
        for name in ["Ana", "Ben", "Cai"] {
            group.push_participant(Participant::create(name.to_string(), None, None));
        }
        let ben = group.participants()[1].id;
        let taken = group.take_participant(&ben).unwrap();
        assert_eq!(taken.name(), "Ben");
        let names: Vec<_> = group.participants().iter().map(|p| p.name().as_str()).collect();
        assert_eq!(names, vec!["Ana", "Cai"]);
    }

    #[test]
    fn test_ids_round_trip_through_strings() {
        let id = ParticipantId::generate();
        let parsed: ParticipantId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GroupStatus::Assigned.to_string(), "Assigned");
    }
}
