//! SQLite-backed group store.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::store::models::{GroupRow, ParticipantRow};
use crate::store::{GroupStore, StoreError, StoreErrorKind, check_record, schema};
use crate::{ExchangeGroup, GroupId, SantaError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Group store persisted in a SQLite database file.
///
/// Every transaction runs as `BEGIN IMMEDIATE`, so writers on the same
/// database are serialized and readers only ever see committed groups.
#[derive(Debug, Clone)]
pub struct SqliteGroupStore {
    db_path: String,
    busy_timeout_ms: u32,
}

impl SqliteGroupStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// Each operation opens its own connection, so `":memory:"` would give
    /// every call an empty database; use [`crate::MemoryGroupStore`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`SantaError::Persistence`] if the database cannot be opened or
    /// migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String, busy_timeout_ms: u32) -> Result<Self, SantaError> {
        info!(path = %db_path, "Opening SqliteGroupStore");
        let store = Self {
            db_path,
            busy_timeout_ms,
        };

        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::unavailable(format!("Migration failed: {}", e)))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "Migrations applied");
        }

        Ok(store)
    }

    /// Returns the database path.
    #[instrument(skip(self))]
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::unavailable(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;

        diesel::sql_query(format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms))
            .execute(&mut conn)?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Loads one group and its participants in stored order.
    #[instrument(skip(conn))]
    fn load(conn: &mut SqliteConnection, id: &GroupId) -> Result<ExchangeGroup, SantaError> {
        let key = id.to_string();
        let row = schema::exchange_groups::table
            .find(&key)
            .select(GroupRow::as_select())
            .first(conn)
            .optional()?
            .ok_or(SantaError::GroupNotFound { group_id: *id })?;

        let participants = schema::participants::table
            .filter(schema::participants::group_id.eq(&key))
            .order(schema::participants::position.asc())
            .select(ParticipantRow::as_select())
            .load(conn)?;

        Ok(row.into_group(participants)?)
    }

    /// Writes the group row and replaces its participant rows.
    #[instrument(skip(conn, group), fields(group_id = %group.id()))]
    fn save(conn: &mut SqliteConnection, group: &ExchangeGroup) -> Result<(), SantaError> {
        let row = GroupRow::from_group(group);
        diesel::update(&row).set(&row).execute(conn)?;

        let key = group.id().to_string();
        diesel::delete(schema::participants::table.filter(schema::participants::group_id.eq(&key)))
            .execute(conn)?;
        Self::insert_participants(conn, group)?;
        Ok(())
    }

    fn insert_participants(
        conn: &mut SqliteConnection,
        group: &ExchangeGroup,
    ) -> Result<(), SantaError> {
        let rows = group
            .participants()
            .iter()
            .enumerate()
            .map(|(position, participant)| {
                let position = i32::try_from(position)
                    .map_err(|_| {
                        StoreError::new(StoreErrorKind::Constraint, "Too many participants to store")
                    })?;
                Ok(ParticipantRow::from_participant(group.id(), position, participant))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        if !rows.is_empty() {
            diesel::insert_into(schema::participants::table)
                .values(&rows)
                .execute(conn)?;
        }
        Ok(())
    }
}

impl GroupStore for SqliteGroupStore {
    #[instrument(skip(self, group), fields(group_id = %group.id(), participants = group.participants().len()))]
    fn create(&self, group: ExchangeGroup) -> Result<GroupId, SantaError> {
        debug!("Creating group");
        check_record(&group)?;
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, SantaError, _>(|conn| {
            diesel::insert_into(schema::exchange_groups::table)
                .values(&GroupRow::from_group(&group))
                .execute(conn)?;
            Self::insert_participants(conn, &group)
        })?;

        info!(group_id = %group.id(), "Group created");
        Ok(*group.id())
    }

    #[instrument(skip(self))]
    fn read(&self, id: &GroupId) -> Result<ExchangeGroup, SantaError> {
        debug!("Reading group");
        let mut conn = self.connection()?;
        // One read transaction so the group row and participants agree.
        conn.transaction::<_, SantaError, _>(|conn| Self::load(conn, id))
    }

    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<ExchangeGroup>, SantaError> {
        debug!("Listing groups");
        let mut conn = self.connection()?;

        conn.transaction::<_, SantaError, _>(|conn| {
            let rows = schema::exchange_groups::table
                .order((
                    schema::exchange_groups::event_date.desc(),
                    schema::exchange_groups::created_at.desc(),
                ))
                .select(GroupRow::as_select())
                .load(conn)?;

            let mut by_group: HashMap<String, Vec<ParticipantRow>> = HashMap::new();
            for participant in schema::participants::table
                .order((
                    schema::participants::group_id.asc(),
                    schema::participants::position.asc(),
                ))
                .select(ParticipantRow::as_select())
                .load(conn)?
            {
                by_group
                    .entry(participant.group_id().clone())
                    .or_default()
                    .push(participant);
            }

            let groups = rows
                .into_iter()
                .map(|row| {
                    let participants = by_group.remove(row.id()).unwrap_or_default();
                    row.into_group(participants)
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            info!(count = groups.len(), "Groups loaded");
            Ok(groups)
        })
    }

    #[instrument(skip(self))]
    fn delete(&self, id: &GroupId) -> Result<(), SantaError> {
        debug!("Deleting group");
        let mut conn = self.connection()?;
        let key = id.to_string();

        conn.immediate_transaction::<_, SantaError, _>(|conn| {
            diesel::delete(
                schema::participants::table.filter(schema::participants::group_id.eq(&key)),
            )
            .execute(conn)?;
            let deleted =
                diesel::delete(schema::exchange_groups::table.find(&key)).execute(conn)?;
            if deleted == 0 {
                return Err(SantaError::GroupNotFound { group_id: *id });
            }
            Ok(())
        })?;

        info!(group_id = %id, "Group deleted");
        Ok(())
    }

    #[instrument(skip(self, mutation))]
    fn with_transaction<T, F>(&self, id: &GroupId, mutation: F) -> Result<T, SantaError>
    where
        F: FnOnce(&mut ExchangeGroup) -> Result<T, SantaError>,
    {
        let mut conn = self.connection()?;

        let result = conn.immediate_transaction::<_, SantaError, _>(|conn| {
            let mut group = Self::load(conn, id)?;
            let value = mutation(&mut group)?;
            Self::save(conn, &group)?;
            Ok(value)
        });

        match &result {
            Ok(_) => debug!(group_id = %id, "Transaction committed"),
            Err(e) if e.is_persistence() => warn!(group_id = %id, error = %e, "Transaction rolled back"),
            Err(_) => debug!(group_id = %id, "Transaction aborted by mutation"),
        }
        result
    }
}
