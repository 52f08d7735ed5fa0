//! Gift-exchange operations exposed to the presentation layer.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::assignment::assign_pairs;
use crate::store::GroupStore;
use crate::{
    ExchangeGroup, GroupId, GroupPolicy, GroupSummary, NewGroup, NewParticipant, Participant,
    ParticipantId, ParticipantRegistry, RevealController, SantaError,
};

/// Service layer for exchange groups.
///
/// Wraps a [`GroupStore`] with the registry rules, the draw and the reveal
/// latch. Every mutating call is one store transaction.
#[derive(Debug)]
pub struct ExchangeService<S, R = StdRng> {
    store: Arc<S>,
    reveals: RevealController<S>,
    rng: Mutex<R>,
    policy: GroupPolicy,
}

impl<S: GroupStore> ExchangeService<S, StdRng> {
    /// Creates a service whose draws are seeded from the operating system.
    #[instrument(skip(store))]
    pub fn from_entropy(store: Arc<S>, policy: GroupPolicy) -> Self {
        Self::new(store, StdRng::from_entropy(), policy)
    }
}

impl<S, R> ExchangeService<S, R>
where
    S: GroupStore,
    R: rand::Rng,
{
    /// Creates a service backed by `store`, drawing pairs with `rng`.
    #[instrument(skip(store, rng))]
    pub fn new(store: Arc<S>, rng: R, policy: GroupPolicy) -> Self {
        info!("Creating ExchangeService");
        Self {
            reveals: RevealController::new(Arc::clone(&store)),
            store,
            rng: Mutex::new(rng),
            policy,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the active group policy.
    pub fn policy(&self) -> &GroupPolicy {
        &self.policy
    }

    /// Creates a draft group with its initial participants and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::InvalidTitle`], [`SantaError::InvalidBudget`] or
    /// [`SantaError::InvalidName`] without storing anything, or
    /// [`SantaError::Persistence`] if the write fails.
    #[instrument(skip(self, details), fields(title = %details.title()))]
    pub fn create_group(&self, details: NewGroup) -> Result<GroupId, SantaError> {
        debug!(participants = details.participant_names().len(), "Creating group");

        let title = details.title().trim();
        if title.is_empty() {
            return Err(SantaError::InvalidTitle);
        }
        let budget = *details.budget();
        if !budget.is_finite() || budget < 0.0 {
            return Err(SantaError::InvalidBudget { budget });
        }

        let mut group = ExchangeGroup::create(
            title.to_string(),
            budget,
            *details.event_date(),
            details.rules().trim().to_string(),
            Utc::now().naive_utc(),
        );

        let mut registry = ParticipantRegistry::new(&mut group, self.policy);
        for name in details.participant_names() {
            registry.add_participant(NewParticipant::named(name.as_str()))?;
        }

        let id = self.store.create(group)?;
        info!(group_id = %id, "Group created");
        Ok(id)
    }

    /// Adds a participant by name.
    ///
    /// # Errors
    ///
    /// See [`ParticipantRegistry::add_participant`].
    #[instrument(skip(self))]
    pub fn add_participant(
        &self,
        group_id: &GroupId,
        name: &str,
    ) -> Result<ParticipantId, SantaError> {
        self.add_participant_details(group_id, NewParticipant::named(name))
    }

    /// Adds a participant with contact and avatar details.
    ///
    /// # Errors
    ///
    /// See [`ParticipantRegistry::add_participant`].
    #[instrument(skip(self, details))]
    pub fn add_participant_details(
        &self,
        group_id: &GroupId,
        details: NewParticipant,
    ) -> Result<ParticipantId, SantaError> {
        self.store.with_transaction(group_id, |group| {
            ParticipantRegistry::new(group, self.policy).add_participant(details)
        })
    }

    /// Removes a participant from a draft group.
    ///
    /// # Errors
    ///
    /// See [`ParticipantRegistry::remove_participant`].
    #[instrument(skip(self))]
    pub fn remove_participant(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> Result<Participant, SantaError> {
        self.store.with_transaction(group_id, |group| {
            ParticipantRegistry::new(group, self.policy).remove_participant(participant_id)
        })
    }

    /// True if the group has at least the policy's usability floor.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn minimum_size_satisfied(&self, group_id: &GroupId) -> Result<bool, SantaError> {
        let group = self.store.read(group_id)?;
        Ok(self.policy.minimum_size_satisfied(&group))
    }

    /// Draws pairs for a group and locks it, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::AlreadyGenerated`],
    /// [`SantaError::InsufficientParticipants`], [`SantaError::GroupNotFound`]
    /// or [`SantaError::Persistence`]. The group is unchanged on any error.
    #[instrument(skip(self))]
    pub fn generate_assignment(&self, group_id: &GroupId) -> Result<(), SantaError> {
        let mut rng = self.rng.lock();
        self.store
            .with_transaction(group_id, |group| assign_pairs(group, &mut *rng, &self.policy))?;
        info!(group_id = %group_id, "Assignment generated");
        Ok(())
    }

    /// Reveals who `participant_id` gives to.
    ///
    /// # Errors
    ///
    /// See [`RevealController::reveal`].
    #[instrument(skip(self))]
    pub fn reveal(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> Result<String, SantaError> {
        self.reveals.reveal(group_id, participant_id)
    }

    /// True once pairs are drawn.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn is_assigned(&self, group_id: &GroupId) -> Result<bool, SantaError> {
        Ok(*self.store.read(group_id)?.assignment_generated())
    }

    /// True once the participant has seen their recipient.
    ///
    /// # Errors
    ///
    /// See [`RevealController::is_revealed`].
    #[instrument(skip(self))]
    pub fn is_revealed(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> Result<bool, SantaError> {
        self.reveals.is_revealed(group_id, participant_id)
    }

    /// Reads a group.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn group(&self, group_id: &GroupId) -> Result<ExchangeGroup, SantaError> {
        self.store.read(group_id)
    }

    /// Summarises a group.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn summary(&self, group_id: &GroupId) -> Result<GroupSummary, SantaError> {
        Ok(GroupSummary::from(&self.store.read(group_id)?))
    }

    /// Summarises every group, latest event first.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::Persistence`] if the read fails.
    #[instrument(skip(self))]
    pub fn list_groups(&self) -> Result<Vec<GroupSummary>, SantaError> {
        let groups = self.store.list()?;
        debug!(count = groups.len(), "Groups listed");
        Ok(groups.iter().map(GroupSummary::from).collect())
    }

    /// Deletes a group and all of its participants.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::GroupNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn delete_group(&self, group_id: &GroupId) -> Result<(), SantaError> {
        self.store.delete(group_id)?;
        info!(group_id = %group_id, "Group deleted");
        Ok(())
    }
}
