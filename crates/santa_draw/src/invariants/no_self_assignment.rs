//! No participant draws themselves.

use super::Invariant;
use crate::Draw;

/// Invariant: no pairing has the same giver and recipient.
pub struct NoSelfAssignment;

impl<T: PartialEq> Invariant<Draw<T>> for NoSelfAssignment {
    fn holds(draw: &Draw<T>) -> bool {
        draw.pairings().iter().all(|p| p.giver() != p.recipient())
    }

    fn description() -> &'static str {
        "No participant is assigned to themselves"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair_in_order;

    #[test]
    fn test_holds_for_cycle() {
        let draw = pair_in_order(&[1, 2, 3, 4]).unwrap();
        assert!(<NoSelfAssignment as Invariant<Draw<i32>>>::holds(&draw));
    }

    #[test]
    fn test_fails_for_fixed_point() {
        let draw = Draw::unchecked(vec![(1, 2), (2, 2)]);
        assert!(!<NoSelfAssignment as Invariant<Draw<i32>>>::holds(&draw));
    }

    #[test]
    fn test_description_mentions_self() {
        let description = <NoSelfAssignment as Invariant<Draw<i32>>>::description();
        assert!(description.contains("themselves"));
    }
}
