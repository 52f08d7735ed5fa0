//! Errors surfaced by gift-exchange operations.
//!
//! Every variant is recoverable from the caller's point of view and none of
//! them leave a partial change behind.

use derive_more::{Display, Error, From};
use santa_draw::DrawError;

use crate::{GroupId, ParticipantId, StoreError};

/// Error returned by registry, draw, reveal and store operations.
#[derive(Debug, Clone, PartialEq, Display, Error, From)]
pub enum SantaError {
    /// Participant name is empty or otherwise unacceptable.
    #[display("Invalid participant name: {reason}")]
    InvalidName {
        /// Why the name was rejected.
        reason: String,
    },

    /// Group title is empty.
    #[display("Group title must not be empty")]
    InvalidTitle,

    /// Budget is negative or not a finite number.
    #[display("Budget must be a non-negative amount, got {budget}")]
    InvalidBudget {
        /// Rejected amount.
        budget: f64,
    },

    /// Participants cannot change once pairs are drawn.
    #[display("Group {group_id} is locked: pairs have already been drawn")]
    GroupLocked {
        /// Locked group.
        group_id: GroupId,
    },

    /// Too few participants to draw pairs.
    #[display("Need at least {required} participants to draw, have {actual}")]
    InsufficientParticipants {
        /// Minimum number required by the active policy.
        required: usize,
        /// Number currently in the group.
        actual: usize,
    },

    /// Pairs were already drawn for this group.
    #[display("Pairs for group {group_id} have already been drawn")]
    AlreadyGenerated {
        /// Group that is already assigned.
        group_id: GroupId,
    },

    /// Reveal attempted before pairs were drawn.
    #[display("Pairs for group {group_id} have not been drawn yet")]
    NotReady {
        /// Group still in draft.
        group_id: GroupId,
    },

    /// No group with this id.
    #[display("Group {group_id} not found")]
    GroupNotFound {
        /// Unknown group id.
        group_id: GroupId,
    },

    /// No participant with this id in the group.
    #[display("Participant {participant_id} not found in group {group_id}")]
    ParticipantNotFound {
        /// Group that was searched.
        group_id: GroupId,
        /// Unknown participant id.
        participant_id: ParticipantId,
    },

    /// The store failed to read or commit.
    #[display("{_0}")]
    #[from]
    Persistence(StoreError),
}

impl SantaError {
    /// True for either not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GroupNotFound { .. } | Self::ParticipantNotFound { .. }
        )
    }

    /// True if the failure came from the store rather than a rule.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<diesel::result::Error> for SantaError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Persistence(StoreError::from(err))
    }
}

impl From<DrawError> for SantaError {
    #[track_caller]
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::InsufficientParticipants { required, actual } => {
                Self::InsufficientParticipants { required, actual }
            }
            // Stored ids are unique, so anything else means a corrupt record.
            other => Self::Persistence(StoreError::corrupt(format!("Corrupt group record: {}", other))),
        }
    }
}
