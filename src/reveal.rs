//! One-time reveal of each participant's recipient.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::store::GroupStore;
use crate::{ExchangeGroup, GroupId, ParticipantId, SantaError, StoreError};

/// Reveals recipients and latches each participant's `revealed` flag.
///
/// The first reveal writes the flag in a single transaction. Later reveals of
/// the same participant return the same name without writing anything.
#[derive(Debug)]
pub struct RevealController<S> {
    store: Arc<S>,
}

impl<S> Clone for RevealController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GroupStore> RevealController<S> {
    /// Creates a controller backed by `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<S>) -> Self {
        info!("Creating RevealController");
        Self { store }
    }

    /// Returns the name of the participant `participant_id` gives to, marking
    /// them as revealed on first call.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::NotReady`] before pairs are drawn,
    /// [`SantaError::GroupNotFound`] or [`SantaError::ParticipantNotFound`]
    /// for unknown ids, and [`SantaError::Persistence`] if the latch cannot be
    /// written.
    #[instrument(skip(self))]
    pub fn reveal(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> Result<String, SantaError> {
        let group = self.store.read(group_id)?;
        let (name, revealed) = resolve(&group, participant_id)?;
        if revealed {
            debug!("Already revealed, nothing to write");
            return Ok(name);
        }

        let name = self.store.with_transaction(group_id, |group| {
            let (name, _) = resolve(group, participant_id)?;
            if let Some(participant) = group.participant_mut(participant_id) {
                participant.mark_revealed();
            }
            Ok(name)
        })?;

        info!("Participant revealed");
        Ok(name)
    }

    /// True if the participant has already seen their recipient.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] or
    /// [`SantaError::ParticipantNotFound`] for unknown ids.
    #[instrument(skip(self))]
    pub fn is_revealed(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> Result<bool, SantaError> {
        let group = self.store.read(group_id)?;
        let participant =
            group
                .participant(participant_id)
                .ok_or(SantaError::ParticipantNotFound {
                    group_id: *group_id,
                    participant_id: *participant_id,
                })?;
        Ok(*participant.revealed())
    }
}

/// Resolves a giver's recipient name and current reveal flag.
fn resolve(
    group: &ExchangeGroup,
    participant_id: &ParticipantId,
) -> Result<(String, bool), SantaError> {
    if !*group.assignment_generated() {
        return Err(SantaError::NotReady {
            group_id: *group.id(),
        });
    }

    let giver = group
        .participant(participant_id)
        .ok_or(SantaError::ParticipantNotFound {
            group_id: *group.id(),
            participant_id: *participant_id,
        })?;

    let recipient = giver
        .assigned_recipient_id()
        .and_then(|id| group.participant(&id))
        .ok_or_else(|| {
            StoreError::corrupt(format!(
                "Assigned group {} has no recipient for {}",
                group.id(),
                participant_id
            ))
        })?;

    Ok((recipient.name().clone(), *giver.revealed()))
}
