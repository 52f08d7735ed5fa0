//! Single-cycle draw construction.

use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::DrawError;
use crate::invariants::{DrawInvariants, InvariantSet};

/// Smallest group a draw can be made for.
pub const MIN_PARTICIPANTS: usize = 2;

/// One giver and the participant they give to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pairing<T> {
    giver: T,
    recipient: T,
}

impl<T> Pairing<T> {
    /// Returns the giver.
    pub fn giver(&self) -> &T {
        &self.giver
    }

    /// Returns the recipient.
    pub fn recipient(&self) -> &T {
        &self.recipient
    }
}

/// A complete draw: every participant appears exactly once as a giver and
/// exactly once as a recipient.
///
/// Pairings are kept in the shuffled order, so `pairings()[i].recipient()` is
/// always `pairings()[(i + 1) % len].giver()`.
///
/// A `Draw` can only be obtained from [`pair_in_order`] or [`generate`], so
/// every value has passed the draw invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw<T> {
    pairings: Vec<Pairing<T>>,
}

#[cfg(test)]
impl<T> Draw<T> {
    /// Builds a draw from raw `(giver, recipient)` pairs without any checks.
    pub(crate) fn unchecked(pairs: Vec<(T, T)>) -> Self {
        let pairings = pairs
            .into_iter()
            .map(|(giver, recipient)| Pairing { giver, recipient })
            .collect();
        Self { pairings }
    }
}

impl<T: PartialEq> Draw<T> {
    /// Returns the pairings in draw order.
    pub fn pairings(&self) -> &[Pairing<T>] {
        &self.pairings
    }

    /// Returns the number of participants in the draw.
    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    /// Returns true if the draw has no pairings.
    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Looks up who `giver` gives to.
    pub fn recipient_of(&self, giver: &T) -> Option<&T> {
        self.pairings
            .iter()
            .find(|p| &p.giver == giver)
            .map(|p| &p.recipient)
    }

    /// Returns the givers in draw order.
    pub fn order(&self) -> impl Iterator<Item = &T> {
        self.pairings.iter().map(|p| &p.giver)
    }
}

impl<T> IntoIterator for Draw<T> {
    type Item = Pairing<T>;
    type IntoIter = std::vec::IntoIter<Pairing<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.into_iter()
    }
}

/// Pairs participants in the given order: each gives to the next one, and
/// the last gives to the first.
///
/// # Errors
///
/// Returns [`DrawError::InsufficientParticipants`] for fewer than
/// [`MIN_PARTICIPANTS`] entries and [`DrawError::DuplicateParticipant`] if an
/// identifier repeats.
#[instrument(skip(order), fields(count = order.len()))]
pub fn pair_in_order<T>(order: &[T]) -> Result<Draw<T>, DrawError>
where
    T: Clone + Eq + Hash,
{
    check_input(order)?;

    let count = order.len();
    let pairings = order
        .iter()
        .enumerate()
        .map(|(i, giver)| Pairing {
            giver: giver.clone(),
            recipient: order[(i + 1) % count].clone(),
        })
        .collect();
    let draw = Draw { pairings };

    DrawInvariants::check_all(&draw).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        DrawError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
    })?;

    trace!(count, "Pairs assembled");
    Ok(draw)
}

/// Shuffles `participants` with `rng` and pairs them into a single cycle.
///
/// The same `rng` state always yields the same draw.
///
/// # Errors
///
/// See [`pair_in_order`]. No draw is produced on error.
#[instrument(skip(participants, rng), fields(count = participants.len()))]
pub fn generate<T, R>(participants: &[T], rng: &mut R) -> Result<Draw<T>, DrawError>
where
    T: Clone + Eq + Hash,
    R: Rng + ?Sized,
{
    check_input(participants)?;

    let mut order = participants.to_vec();
    order.shuffle(rng);
    debug!(count = order.len(), "Participants shuffled");

    pair_in_order(&order)
}

fn check_input<T: Eq + Hash>(participants: &[T]) -> Result<(), DrawError> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(DrawError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            actual: participants.len(),
        });
    }

    let mut seen = HashSet::with_capacity(participants.len());
    if !participants.iter().all(|p| seen.insert(p)) {
        return Err(DrawError::DuplicateParticipant);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_three_in_order() {
        let draw = pair_in_order(&["B", "C", "A"]).unwrap();
        assert_eq!(draw.recipient_of(&"B"), Some(&"C"));
        assert_eq!(draw.recipient_of(&"C"), Some(&"A"));
        assert_eq!(draw.recipient_of(&"A"), Some(&"B"));
        assert_eq!(draw.order().copied().collect::<Vec<_>>(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_pair_is_mutual() {
        let draw = pair_in_order(&["A", "B"]).unwrap();
        assert_eq!(draw.recipient_of(&"A"), Some(&"B"));
        assert_eq!(draw.recipient_of(&"B"), Some(&"A"));
    }

    #[test]
    fn test_empty_and_single_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let empty: [u32; 0] = [];
        assert_eq!(
            generate(&empty, &mut rng),
            Err(DrawError::InsufficientParticipants { required: 2, actual: 0 })
        );
        assert_eq!(
            generate(&[42], &mut rng),
            Err(DrawError::InsufficientParticipants { required: 2, actual: 1 })
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            generate(&[1, 2, 1], &mut rng),
            Err(DrawError::DuplicateParticipant)
        );
    }

    #[test]
    fn test_same_seed_same_draw() {
        let people = ["ana", "ben", "cai", "dee", "eli", "fay"];
        let first = generate(&people, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
        let second = generate(&people, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_follows_shuffled_order() {
        let people = ["ana", "ben", "cai", "dee", "eli"];
        let draw = generate(&people, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        let order: Vec<_> = draw.order().copied().collect();
        assert_eq!(pair_in_order(&order).unwrap(), draw);

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, people.to_vec());
    }
}
