//! Product rules layered on top of the draw.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ExchangeGroup;

/// Group rules chosen by the application rather than required by the draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GroupPolicy {
    /// Usability floor reported by `minimum_size_satisfied`.
    min_participants: usize,
    /// Whether a two-person group may be drawn. Such a draw is mutual, so
    /// neither participant's assignment is secret.
    allow_pairs: bool,
    /// Whether two participants may share a name (trimmed, case-insensitive).
    allow_duplicate_names: bool,
}

impl GroupPolicy {
    /// Creates a policy.
    #[instrument]
    pub fn new(min_participants: usize, allow_pairs: bool, allow_duplicate_names: bool) -> Self {
        Self {
            min_participants,
            allow_pairs,
            allow_duplicate_names,
        }
    }

    /// Smallest group this policy will draw pairs for.
    pub fn draw_minimum(&self) -> usize {
        if self.allow_pairs {
            santa_draw::MIN_PARTICIPANTS
        } else {
            santa_draw::MIN_PARTICIPANTS + 1
        }
    }

    /// True if `group` has at least the usability floor of participants.
    #[instrument(skip(self, group), fields(group_id = %group.id(), count = group.participants().len()))]
    pub fn minimum_size_satisfied(&self, group: &ExchangeGroup) -> bool {
        group.participants().len() >= self.min_participants
    }
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self {
            min_participants: 3,
            allow_pairs: true,
            allow_duplicate_names: false,
        }
    }
}
