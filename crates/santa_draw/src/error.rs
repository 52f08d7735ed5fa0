//! Errors produced while drawing pairs.

/// Error that can occur when generating a draw.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DrawError {
    /// Fewer participants than a draw needs.
    #[display("Need at least {required} participants, got {actual}")]
    InsufficientParticipants {
        /// Minimum number of participants.
        required: usize,
        /// Number of participants supplied.
        actual: usize,
    },

    /// The same identifier appeared more than once in the input.
    #[display("Participant identifiers must be unique")]
    DuplicateParticipant,

    /// A produced draw failed its postcondition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for DrawError {}
