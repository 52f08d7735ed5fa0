//! Santa Draw - pure gift-exchange pairing logic
//!
//! Given an ordered set of participant identifiers, produces a giver to
//! recipient mapping in which nobody draws themselves.
//!
//! # Construction
//!
//! The participants are shuffled with a caller-supplied random source and
//! each one gives to the next in the shuffled order, wrapping around at the
//! end. The result is always a single cycle covering everyone, so no
//! participant can be their own recipient. Only single-cycle derangements are
//! ever produced; this is not a uniform derangement sampler.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use santa_draw::generate;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let draw = generate(&["ana", "ben", "cai"], &mut rng).unwrap();
//! assert_eq!(draw.len(), 3);
//! for pairing in draw.pairings() {
//!     assert_ne!(pairing.giver(), pairing.recipient());
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod draw;
mod error;
mod invariants;

pub use draw::{Draw, MIN_PARTICIPANTS, Pairing, generate, pair_in_order};
pub use error::DrawError;
pub use invariants::{
    DrawInvariants, Invariant, InvariantSet, InvariantViolation, NoSelfAssignment, SingleCycle,
};
