//! The draw forms one cycle through every participant.

use std::collections::HashMap;
use std::hash::Hash;

use super::Invariant;
use crate::Draw;

/// Invariant: following recipients from any giver visits every participant
/// exactly once before returning to the start.
///
/// Also rules out a participant appearing twice as giver, or a recipient who
/// never gives.
pub struct SingleCycle;

impl<T: Eq + Hash> Invariant<Draw<T>> for SingleCycle {
    fn holds(draw: &Draw<T>) -> bool {
        let count = draw.len();
        let Some(start) = draw.pairings().first().map(|p| p.giver()) else {
            return true;
        };

        let next: HashMap<&T, &T> = draw
            .pairings()
            .iter()
            .map(|p| (p.giver(), p.recipient()))
            .collect();
        if next.len() != count {
            return false;
        }

        // The start must come back after exactly `count` steps and not before.
        let mut current = start;
        for step in 1..=count {
            let Some(&recipient) = next.get(current) else {
                return false;
            };
            current = recipient;
            if current == start {
                return step == count;
            }
        }
        false
    }

    fn description() -> &'static str {
        "Recipients form a single cycle covering every participant"
    }
}
