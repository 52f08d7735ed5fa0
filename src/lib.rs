//! Secret Santa library - gift-exchange draws with durable assignments
//!
//! Creates exchange groups, draws a self-assignment-free pairing for each
//! group in one atomic step, and lets each participant reveal their recipient
//! exactly once.
//!
//! # Architecture
//!
//! - **Draw**: pure single-cycle pairing (`santa_draw` crate)
//! - **Registry**: participant membership and naming rules
//! - **Store**: transactional persistence (SQLite or in-memory)
//! - **Reveal**: one-way reveal latch per participant
//! - **Service**: the operations offered to a front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use secret_santa::{ExchangeService, GroupPolicy, MemoryGroupStore, NewGroup};
//!
//! # fn example() -> anyhow::Result<()> {
//! let service = ExchangeService::from_entropy(Arc::new(MemoryGroupStore::new()), GroupPolicy::default());
//! let group_id = service.create_group(NewGroup::new(
//!     "Office party".to_string(),
//!     25.0,
//!     NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
//!     "Nothing edible".to_string(),
//!     vec!["Ana".to_string(), "Ben".to_string(), "Cai".to_string()],
//! ))?;
//! service.generate_assignment(&group_id)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod assignment;
mod config;
mod error;
mod model;
mod policy;
mod registry;
mod reveal;
mod service;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, SantaConfig};

// Crate-level exports - Errors
pub use error::SantaError;

// Crate-level exports - Records
pub use model::{
    ExchangeGroup, GroupId, GroupStatus, GroupSummary, NewGroup, NewParticipant, Participant,
    ParticipantId,
};

// Crate-level exports - Rules
pub use assignment::assign_pairs;
pub use policy::GroupPolicy;
pub use registry::{ParticipantRegistry, normalize_name};

// Crate-level exports - Reveal and service
pub use reveal::RevealController;
pub use service::ExchangeService;

// Crate-level exports - Storage
pub use store::{GroupStore, MemoryGroupStore, SqliteGroupStore, StoreError, StoreErrorKind};
