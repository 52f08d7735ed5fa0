//! Storage error types.

use derive_more::{Display, Error};
use diesel::result::DatabaseErrorKind;
use strum::Display as StrumDisplay;
use tracing::instrument;

/// Broad cause of a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum StoreErrorKind {
    /// The database could not be opened or reached.
    Unavailable,
    /// Another writer held the lock past the busy timeout.
    Busy,
    /// A stored or submitted record breaks a group invariant.
    Corrupt,
    /// The database rejected a write on a schema constraint.
    Constraint,
    /// Any other query failure.
    Query,
}

/// Storage error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Storage error ({kind}): {message} at {file}:{line}")]
pub struct StoreError {
    /// What kind of failure this is.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a storage error of `kind`, recording the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// A record that breaks a group invariant.
    #[track_caller]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Corrupt, message)
    }

    /// Storage that cannot be reached.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as DieselError;

        let kind = match &err {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                _,
            ) => StoreErrorKind::Constraint,
            DieselError::DatabaseError(_, info)
                if info.message().contains("locked") || info.message().contains("busy") =>
            {
                StoreErrorKind::Busy
            }
            _ => StoreErrorKind::Query,
        };
        Self::new(kind, format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::unavailable(format!("Connection error: {}", err))
    }
}

impl From<uuid::Error> for StoreError {
    #[track_caller]
    fn from(err: uuid::Error) -> Self {
        Self::corrupt(format!("Malformed stored id: {}", err))
    }
}
