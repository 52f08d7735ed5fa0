//! Property tests for single-cycle draws.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use santa_draw::{Draw, DrawError, DrawInvariants, InvariantSet, generate};

/// Follows recipients from `start` until it comes back, returning the number
/// of steps taken (capped at `len + 1`).
fn cycle_length(draw: &Draw<u32>, start: u32) -> usize {
    let mut current = start;
    for step in 1..=draw.len() + 1 {
        current = *draw.recipient_of(&current).expect("Every giver has a recipient");
        if current == start {
            return step;
        }
    }
    draw.len() + 1
}

proptest! {
    #[test]
    fn prop_nobody_draws_themselves(n in 2usize..40, seed in any::<u64>()) {
        let ids: Vec<u32> = (0..n as u32).collect();
        let draw = generate(&ids, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        for id in &ids {
            prop_assert_ne!(draw.recipient_of(id), Some(id));
        }
    }

    #[test]
    fn prop_every_start_returns_after_exactly_n_steps(n in 2usize..40, seed in any::<u64>()) {
        let ids: Vec<u32> = (0..n as u32).collect();
        let draw = generate(&ids, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        for id in &ids {
            prop_assert_eq!(cycle_length(&draw, *id), n);
        }
    }

    #[test]
    fn prop_everyone_gives_and_receives_once(n in 2usize..40, seed in any::<u64>()) {
        let ids: Vec<u32> = (0..n as u32).map(|i| i * 7 + 3).collect();
        let draw = generate(&ids, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        let givers: HashSet<u32> = draw.pairings().iter().map(|p| *p.giver()).collect();
        let recipients: HashSet<u32> = draw.pairings().iter().map(|p| *p.recipient()).collect();
        let expected: HashSet<u32> = ids.iter().copied().collect();

        prop_assert_eq!(draw.len(), n);
        prop_assert_eq!(&givers, &expected);
        prop_assert_eq!(&recipients, &expected);
        prop_assert!(DrawInvariants::check_all(&draw).is_ok());
    }
}

#[test]
fn test_fewer_than_two_is_an_error() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let result = generate(&["solo"], &mut rng);
    assert!(matches!(
        result,
        Err(DrawError::InsufficientParticipants { required: 2, actual: 1 })
    ));
}

#[test]
fn test_two_participants_swap() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let draw = generate(&["A", "B"], &mut rng).unwrap();
    assert_eq!(draw.recipient_of(&"A"), Some(&"B"));
    assert_eq!(draw.recipient_of(&"B"), Some(&"A"));
}

#[test]
fn test_error_message_reports_counts() {
    let err = DrawError::InsufficientParticipants { required: 2, actual: 0 };
    assert_eq!(err.to_string(), "Need at least 2 participants, got 0");
}
