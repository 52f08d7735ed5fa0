//! Durable storage for exchange groups.
//!
//! All mutation goes through [`GroupStore::with_transaction`], which hands the
//! caller a writable copy of one group and commits every change to it at once,
//! or none of them.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryGroupStore;
pub use sqlite::SqliteGroupStore;

use std::collections::HashSet;

use crate::{ExchangeGroup, GroupId, ParticipantId, SantaError};

/// Persistence contract for exchange groups.
///
/// Implementations serialize transactions on the same group, never expose a
/// partially committed transaction to readers, and keep participant order
/// stable across reads.
pub trait GroupStore: Send + Sync {
    /// Stores a new group with its participants and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::Persistence`] if the write fails.
    fn create(&self, group: ExchangeGroup) -> Result<GroupId, SantaError>;

    /// Reads a committed group.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    fn read(&self, id: &GroupId) -> Result<ExchangeGroup, SantaError>;

    /// Lists every group, latest event date first.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::Persistence`] if the read fails.
    fn list(&self) -> Result<Vec<ExchangeGroup>, SantaError>;

    /// Deletes a group together with its participants.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    fn delete(&self, id: &GroupId) -> Result<(), SantaError>;

    /// Runs `mutation` against the live group and commits all of its changes
    /// atomically.
    ///
    /// If `mutation` returns an error nothing is written and that error is
    /// returned. If the commit itself fails the group stays exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id, the mutation's
    /// own error, or [`SantaError::Persistence`] on commit failure.
    fn with_transaction<T, F>(&self, id: &GroupId, mutation: F) -> Result<T, SantaError>
    where
        F: FnOnce(&mut ExchangeGroup) -> Result<T, SantaError>;
}

/// Rejects a group record that could not have come from the registry and
/// the draw.
#[track_caller]
pub(crate) fn check_record(group: &ExchangeGroup) -> Result<(), StoreError> {
    if group.title().trim().is_empty() {
        return Err(StoreError::corrupt(format!("Group {} has an empty title", group.id())));
    }
    if !group.budget().is_finite() || *group.budget() < 0.0 {
        return Err(StoreError::corrupt(format!(
            "Group {} has an invalid budget {}",
            group.id(),
            group.budget()
        )));
    }

    let ids: HashSet<ParticipantId> = group.participant_ids().into_iter().collect();
    if ids.len() != group.participants().len() {
        return Err(StoreError::corrupt(format!(
            "Group {} repeats a participant id",
            group.id()
        )));
    }

    let mut recipients = HashSet::new();
    for participant in group.participants() {
        if participant.name().trim().is_empty() {
            return Err(StoreError::corrupt(format!(
                "Participant {} has an empty name",
                participant.id()
            )));
        }
        match participant.assigned_recipient_id() {
            Some(recipient) if recipient == participant.id() => {
                return Err(StoreError::corrupt(format!(
                    "Participant {} is assigned to themselves",
                    participant.id()
                )));
            }
            Some(recipient) if !ids.contains(recipient) || !recipients.insert(*recipient) => {
                return Err(StoreError::corrupt(format!(
                    "Participant {} has a dangling or shared recipient",
                    participant.id()
                )));
            }
            Some(_) if !*group.assignment_generated() => {
                return Err(StoreError::corrupt(format!(
                    "Draft group {} has an assigned participant",
                    group.id()
                )));
            }
            None if *group.assignment_generated() => {
                return Err(StoreError::corrupt(format!(
                    "Assigned group {} has no recipient for {}",
                    group.id(),
                    participant.id()
                )));
            }
            _ => {}
        }
        if *participant.revealed() && participant.assigned_recipient_id().is_none() {
            return Err(StoreError::corrupt(format!(
                "Participant {} is revealed without a recipient",
                participant.id()
            )));
        }
    }
    Ok(())
}
