//! Drawing pairs for a group.

use rand::Rng;
use tracing::{debug, info, instrument, trace, warn};

use crate::{ExchangeGroup, GroupPolicy, SantaError, StoreError};

/// Draws pairs for `group` and records every participant's recipient.
///
/// Meant to run inside a store transaction: on error the group is left
/// untouched, and on success the group moves from draft to assigned with all
/// recipients written.
///
/// # Errors
///
/// Returns [`SantaError::AlreadyGenerated`] if pairs exist and
/// [`SantaError::InsufficientParticipants`] if the group is smaller than the
/// policy's draw minimum.
#[instrument(skip(group, rng, policy), fields(group_id = %group.id(), count = group.participants().len()))]
pub fn assign_pairs<R>(
    group: &mut ExchangeGroup,
    rng: &mut R,
    policy: &GroupPolicy,
) -> Result<(), SantaError>
where
    R: Rng + ?Sized,
{
    if *group.assignment_generated() {
        return Err(SantaError::AlreadyGenerated {
            group_id: *group.id(),
        });
    }

    let ids = group.participant_ids();
    let required = policy.draw_minimum();
    if ids.len() < required {
        return Err(SantaError::InsufficientParticipants {
            required,
            actual: ids.len(),
        });
    }
    if ids.len() == santa_draw::MIN_PARTICIPANTS {
        warn!("Two-person draw: each participant will know who has them");
    }

    let draw = santa_draw::generate(&ids, rng)?;
    debug!(pairs = draw.len(), "Pairs drawn");

    // Work on a copy so a lookup failure cannot leave half the group assigned.
    let mut assigned = group.clone();
    for pairing in draw {
        trace!(giver = %pairing.giver(), recipient = %pairing.recipient(), "Pairing");
        let giver = assigned.participant_mut(pairing.giver()).ok_or_else(|| {
            StoreError::corrupt(format!("Drawn giver {} is not in the group", pairing.giver()))
        })?;
        giver.assign_to(*pairing.recipient());
    }
    assigned.mark_assigned();
    *group = assigned;

    info!("Group assigned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewParticipant, ParticipantRegistry};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn group_of(names: &[&str]) -> ExchangeGroup {
        let date = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let mut group = ExchangeGroup::create(
            "Team".to_string(),
            20.0,
            date,
            String::new(),
            date.and_hms_opt(8, 0, 0).unwrap(),
        );
        let mut registry = ParticipantRegistry::new(&mut group, GroupPolicy::default());
        for name in names {
            registry.add_participant(NewParticipant::named(*name)).unwrap();
        }
        group
    }

    #[test]
    fn test_every_participant_gets_someone_else() {
        let mut group = group_of(&["Ana", "Ben", "Cai", "Dee"]);
        let mut rng = StdRng::seed_from_u64(11);
        assign_pairs(&mut group, &mut rng, &GroupPolicy::default()).unwrap();

        assert!(*group.assignment_generated());
        for participant in group.participants() {
            let recipient = participant.assigned_recipient_id().unwrap();
            assert_ne!(recipient, *participant.id());
            assert!(group.participant(&recipient).is_some());
        }
    }

    #[test]
    fn test_second_draw_rejected_and_pairs_kept() {
        let mut group = group_of(&["Ana", "Ben", "Cai"]);
        let mut rng = StdRng::seed_from_u64(3);
        assign_pairs(&mut group, &mut rng, &GroupPolicy::default()).unwrap();
        let before = group.clone();

        let result = assign_pairs(&mut group, &mut rng, &GroupPolicy::default());
        assert!(matches!(result, Err(SantaError::AlreadyGenerated { .. })));
        assert_eq!(group, before);
    }

    #[test]
    fn test_single_participant_rejected() {
        let mut group = group_of(&["Ana"]);
        let mut rng = StdRng::seed_from_u64(3);
        let result = assign_pairs(&mut group, &mut rng, &GroupPolicy::default());
        assert_eq!(
            result,
            Err(SantaError::InsufficientParticipants { required: 2, actual: 1 })
        );
        assert!(!*group.assignment_generated());
    }

    #[test]
    fn test_pairs_rejected_when_policy_forbids() {
        let mut group = group_of(&["Ana", "Ben"]);
        let mut rng = StdRng::seed_from_u64(3);
        let policy = GroupPolicy::new(3, false, false);
        let result = assign_pairs(&mut group, &mut rng, &policy);
        assert_eq!(
            result,
            Err(SantaError::InsufficientParticipants { required: 3, actual: 2 })
        );
    }
}
