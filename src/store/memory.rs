//! In-process group store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::store::{GroupStore, StoreError, check_record};
use crate::{ExchangeGroup, GroupId, SantaError};

/// Group store held entirely in memory.
///
/// A transaction mutates a clone of the record and swaps it in only when the
/// mutation succeeds, so readers never see half of a change.
#[derive(Debug, Default)]
pub struct MemoryGroupStore {
    groups: Mutex<BTreeMap<GroupId, ExchangeGroup>>,
    fail_commits: AtomicBool,
}

impl MemoryGroupStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating MemoryGroupStore");
        Self::default()
    }

    /// Makes every later commit fail as if storage were unavailable.
    #[instrument(skip(self))]
    pub fn set_fail_commits(&self, fail: bool) {
        warn!(fail, "Commit failure injection changed");
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    #[track_caller]
    fn check_commit(&self) -> Result<(), SantaError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("Storage unavailable").into());
        }
        Ok(())
    }
}

impl GroupStore for MemoryGroupStore {
    #[instrument(skip(self, group), fields(group_id = %group.id()))]
    fn create(&self, group: ExchangeGroup) -> Result<GroupId, SantaError> {
        check_record(&group)?;
        self.check_commit()?;
        let id = *group.id();
        self.groups.lock().insert(id, group);
        info!(group_id = %id, "Group stored");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn read(&self, id: &GroupId) -> Result<ExchangeGroup, SantaError> {
        self.groups
            .lock()
            .get(id)
            .cloned()
            .ok_or(SantaError::GroupNotFound { group_id: *id })
    }

    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<ExchangeGroup>, SantaError> {
        let mut groups: Vec<_> = self.groups.lock().values().cloned().collect();
        groups.sort_by(|a, b| {
            b.event_date()
                .cmp(a.event_date())
                .then_with(|| b.created_at().cmp(a.created_at()))
        });
        debug!(count = groups.len(), "Groups listed");
        Ok(groups)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &GroupId) -> Result<(), SantaError> {
        let mut groups = self.groups.lock();
        if !groups.contains_key(id) {
            return Err(SantaError::GroupNotFound { group_id: *id });
        }
        self.check_commit()?;
        groups.remove(id);
        info!(group_id = %id, "Group deleted");
        Ok(())
    }

    #[instrument(skip(self, mutation))]
    fn with_transaction<T, F>(&self, id: &GroupId, mutation: F) -> Result<T, SantaError>
    where
        F: FnOnce(&mut ExchangeGroup) -> Result<T, SantaError>,
    {
        let mut groups = self.groups.lock();
        let mut draft = groups
            .get(id)
            .cloned()
            .ok_or(SantaError::GroupNotFound { group_id: *id })?;

        let value = mutation(&mut draft)?;
        self.check_commit()?;

        groups.insert(*id, draft);
        debug!(group_id = %id, "Transaction committed");
        Ok(value)
    }
}
