//! Participant membership rules for a single group.

use tracing::{debug, info, instrument};

use crate::{
    ExchangeGroup, GroupPolicy, NewParticipant, Participant, ParticipantId, SantaError,
};

/// Adds and removes participants of one group, enforcing the naming policy
/// and the lock that follows a draw.
///
/// Works on the writable group handed out by a store transaction, so its
/// changes commit or roll back with that transaction.
#[derive(Debug)]
pub struct ParticipantRegistry<'g> {
    group: &'g mut ExchangeGroup,
    policy: GroupPolicy,
}

impl<'g> ParticipantRegistry<'g> {
    /// Wraps a group for membership changes.
    pub fn new(group: &'g mut ExchangeGroup, policy: GroupPolicy) -> Self {
        Self { group, policy }
    }

    /// Appends a new hidden, unassigned participant and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupLocked`] once pairs are drawn and
    /// [`SantaError::InvalidName`] for an empty, malformed or (by policy)
    /// duplicate name.
    #[instrument(skip(self, details), fields(group_id = %self.group.id()))]
    pub fn add_participant(&mut self, details: NewParticipant) -> Result<ParticipantId, SantaError> {
        self.ensure_unlocked()?;

        let (name, contact_info, avatar_ref) = details.into_parts();
        let name = normalize_name(&name)?;
        if !self.policy.allow_duplicate_names() && self.has_name(&name) {
            return Err(SantaError::InvalidName {
                reason: format!("'{}' is already in this group", name),
            });
        }

        let participant = Participant::create(name, contact_info, avatar_ref);
        let id = *participant.id();
        self.group.push_participant(participant);

        info!(participant_id = %id, count = self.group.participants().len(), "Participant added");
        Ok(id)
    }

    /// Removes a participant and returns their record.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupLocked`] once pairs are drawn and
    /// [`SantaError::ParticipantNotFound`] for an unknown id.
    #[instrument(skip(self), fields(group_id = %self.group.id()))]
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant, SantaError> {
        self.ensure_unlocked()?;

        let removed = self
            .group
            .take_participant(id)
            .ok_or(SantaError::ParticipantNotFound {
                group_id: *self.group.id(),
                participant_id: *id,
            })?;

        info!(participant_id = %id, count = self.group.participants().len(), "Participant removed");
        Ok(removed)
    }

    /// True if the group meets the policy's usability floor.
    pub fn minimum_size_satisfied(&self) -> bool {
        self.policy.minimum_size_satisfied(self.group)
    }

    fn ensure_unlocked(&self) -> Result<(), SantaError> {
        if *self.group.assignment_generated() {
            debug!("Membership change rejected on assigned group");
            return Err(SantaError::GroupLocked {
                group_id: *self.group.id(),
            });
        }
        Ok(())
    }

    fn has_name(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.group
            .participants()
            .iter()
            .any(|p| p.name().to_lowercase() == wanted)
    }
}

/// Trims a display name and rejects empty or control-character names.
///
/// # Errors
///
/// Returns [`SantaError::InvalidName`] with the reason.
pub fn normalize_name(name: &str) -> Result<String, SantaError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SantaError::InvalidName {
            reason: "name is empty".to_string(),
        });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(SantaError::InvalidName {
            reason: "name contains control characters".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
