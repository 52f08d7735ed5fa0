//! Database rows and their mapping to domain records.

use chrono::{NaiveDate, NaiveDateTime};
use derive_getters::Getters;
use diesel::prelude::*;
use tracing::instrument;

use crate::store::{StoreError, schema};
use crate::{ExchangeGroup, GroupId, Participant, ParticipantId};

/// Exchange group row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable, Getters)]
#[diesel(table_name = schema::exchange_groups)]
pub struct GroupRow {
    id: String,
    title: String,
    budget: f64,
    event_date: NaiveDate,
    rules: String,
    assignment_generated: bool,
    created_at: NaiveDateTime,
}

impl GroupRow {
    /// Flattens a group into its row, leaving participants aside.
    #[instrument(skip(group), fields(group_id = %group.id()))]
    pub fn from_group(group: &ExchangeGroup) -> Self {
        Self {
            id: group.id().to_string(),
            title: group.title().clone(),
            budget: *group.budget(),
            event_date: *group.event_date(),
            rules: group.rules().clone(),
            assignment_generated: *group.assignment_generated(),
            created_at: *group.created_at(),
        }
    }

    /// Rebuilds the domain group from this row and its participants.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a stored id is not a valid UUID.
    #[instrument(skip(self, participants), fields(group_id = %self.id, count = participants.len()))]
    pub fn into_group(self, participants: Vec<ParticipantRow>) -> Result<ExchangeGroup, StoreError> {
        let participants = participants
            .into_iter()
            .map(ParticipantRow::into_participant)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExchangeGroup::restore(
            self.id.parse::<GroupId>()?,
            self.title,
            self.budget,
            self.event_date,
            self.rules,
            participants,
            self.assignment_generated,
            self.created_at,
        ))
    }
}

/// Participant row. `position` preserves the group's ordering.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::participants)]
#[diesel(treat_none_as_default_value = false)]
pub struct ParticipantRow {
    id: String,
    group_id: String,
    position: i32,
    name: String,
    contact_info: Option<String>,
    avatar_ref: Option<String>,
    assigned_recipient_id: Option<String>,
    revealed: bool,
}

impl ParticipantRow {
    /// Flattens a participant at `position` within `group_id`.
    pub fn from_participant(group_id: &GroupId, position: i32, participant: &Participant) -> Self {
        Self {
            id: participant.id().to_string(),
            group_id: group_id.to_string(),
            position,
            name: participant.name().clone(),
            contact_info: participant.contact_info().clone(),
            avatar_ref: participant.avatar_ref().clone(),
            assigned_recipient_id: participant.assigned_recipient_id().map(|id| id.to_string()),
            revealed: *participant.revealed(),
        }
    }

    /// Rebuilds the domain participant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a stored id is not a valid UUID.
    pub fn into_participant(self) -> Result<Participant, StoreError> {
        let recipient = self
            .assigned_recipient_id
            .as_deref()
            .map(str::parse::<ParticipantId>)
            .transpose()?;

        Ok(Participant::restore(
            self.id.parse::<ParticipantId>()?,
            self.name,
            self.contact_info,
            self.avatar_ref,
            recipient,
            self.revealed,
        ))
    }
}
