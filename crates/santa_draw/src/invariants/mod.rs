//! Properties a finished draw must have.
//!
//! [`pair_in_order`](crate::pair_in_order) builds a cycle that has them by
//! construction and checks them once more before handing the draw out. Each
//! property lives in its own module, next to tests that feed it broken
//! pairings.

mod no_self_assignment;
mod single_cycle;

pub use no_self_assignment::NoSelfAssignment;
pub use single_cycle::SingleCycle;

use derive_more::Display;

/// A yes/no property of a draw.
pub trait Invariant<S> {
    /// True if `draw` has the property.
    fn holds(draw: &S) -> bool;

    /// Sentence naming the property, used in error messages.
    fn description() -> &'static str;
}

/// A property a draw was found to lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Sentence naming the missing property.
    pub description: &'static str,
}

/// Several properties checked in one pass, reporting every one that fails.
pub trait InvariantSet<S> {
    /// Returns every property `draw` lacks, or `Ok(())` if it has them all.
    fn check_all(draw: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, A, B> InvariantSet<S> for (A, B)
where
    A: Invariant<S>,
    B: Invariant<S>,
{
    fn check_all(draw: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (A::holds(draw), A::description()),
            (B::holds(draw), B::description()),
        ]
        .into_iter()
        .filter(|(held, _)| !held)
        .map(|(_, description)| InvariantViolation { description })
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// What every draw handed out by this crate satisfies.
pub type DrawInvariants = (NoSelfAssignment, SingleCycle);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Draw;

    #[test]
    fn test_two_mutual_pairs_lack_only_the_cycle() {
        let draw = Draw::unchecked(vec![(1, 2), (2, 1), (3, 4), (4, 3)]);
        let violations = DrawInvariants::check_all(&draw).unwrap_err();
        assert_eq!(
            violations,
            vec![InvariantViolation {
                description: <SingleCycle as Invariant<Draw<i32>>>::description()
            }]
        );
    }

    #[test]
    fn test_fixed_point_reports_both() {
        // 1 -> 1 is a self-assignment and leaves 2 -> 3 -> 2 as a second cycle.
        let draw = Draw::unchecked(vec![(1, 1), (2, 3), (3, 2)]);
        let violations = DrawInvariants::check_all(&draw).unwrap_err();
        assert_eq!(violations.len(), 2);
    }
}
