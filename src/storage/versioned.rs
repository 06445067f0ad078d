//! Versioned entity store
//!
//! `MainData` holds the current state of every entity and `HistoryData`
//! holds numbered snapshots. Creating an entity writes version 1 with the
//! created values; every later update first snapshots the state it is
//! about to replace at `max(version) + 1` and only then overwrites the row,
//! so history trails the live row by one write.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, VsError};
use crate::storage::sqlite::Database;

/// Format shared with SQLite's `CURRENT_TIMESTAMP`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current state of one id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl Entity {
    pub fn new(id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Immutable snapshot of an entity at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub version: i64,
    pub name: String,
    pub address: String,
    pub changed_at: String,
}

impl VersionRecord {
    /// Whether this snapshot holds the same values as `entity`.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.id == entity.id && self.name == entity.name && self.address == entity.address
    }
}

/// What an upsert did to the receiving store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "record", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created(VersionRecord),
    Updated(VersionRecord),
}

impl UpsertOutcome {
    /// The history record written by the upsert.
    #[must_use]
    pub const fn record(&self) -> &VersionRecord {
        match self {
            Self::Created(record) | Self::Updated(record) => record,
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// One replica's entity and history tables.
#[derive(Debug)]
pub struct VersionedStore {
    db: Database,
    label: String,
}

impl VersionedStore {
    /// Wrap an open database; the label defaults to its locator.
    pub fn new(db: Database) -> Self {
        let label = db.locator().to_string();
        Self { db, label }
    }

    /// Wrap an open database under a caller-chosen label (e.g. "local").
    pub fn with_label(db: Database, label: impl Into<String>) -> Self {
        Self {
            db,
            label: label.into(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub const fn db(&self) -> &Database {
        &self.db
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Insert a new entity together with history version 1.
    pub fn create(&self, id: i64, name: &str, address: &str) -> Result<VersionRecord> {
        let record = self.write("create", |conn| create_in(conn, id, name, address))?;
        info!(store = %self.label, id, "created entity");
        Ok(record)
    }

    /// Snapshot the current state at the next version, then overwrite it.
    pub fn update(&self, id: i64, name: &str, address: &str) -> Result<VersionRecord> {
        let record = self.write("update", |conn| update_in(conn, id, name, address))?;
        info!(store = %self.label, id, version = record.version, "updated entity");
        Ok(record)
    }

    /// Restore the entity row to a stored version. History is left untouched.
    pub fn rollback(&self, id: i64, version: i64) -> Result<Entity> {
        let entity = self.write("rollback", |conn| rollback_in(conn, id, version))?;
        info!(store = %self.label, id, version, "rolled back entity");
        Ok(entity)
    }

    /// Update when the entity exists, create otherwise.
    pub fn upsert(&self, id: i64, name: &str, address: &str) -> Result<UpsertOutcome> {
        let outcome = self.write("upsert", |conn| upsert_in(conn, id, name, address))?;
        info!(
            store = %self.label,
            id,
            version = outcome.record().version,
            created = outcome.is_created(),
            "upserted entity"
        );
        Ok(outcome)
    }

    fn write<T>(&self, operation: &str, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let tx = self.db.begin(operation)?;
        let value = op(&*tx).map_err(|err| backend_to_transaction(operation, err))?;
        Database::commit(tx, operation)?;
        Ok(value)
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn get(&self, id: i64) -> Result<Option<Entity>> {
        Ok(entity_in(self.db.conn(), id)?)
    }

    /// All entities ordered by id.
    pub fn entities(&self) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        self.for_each_entity(|entity| {
            entities.push(entity);
            Ok(())
        })?;
        Ok(entities)
    }

    /// Walk `MainData` in id order through a live cursor, one row at a time.
    pub fn for_each_entity(&self, mut visit: impl FnMut(Entity) -> Result<()>) -> Result<u64> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT id, name, address FROM MainData ORDER BY id")?;
        let mut rows = stmt.query([])?;
        let mut seen = 0u64;
        while let Some(row) = rows.next()? {
            visit(entity_from_row(row)?)?;
            seen += 1;
        }
        Ok(seen)
    }

    /// History for one id ordered by version.
    pub fn history(&self, id: i64) -> Result<Vec<VersionRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, version, name, address, changed_at
             FROM HistoryData WHERE id = ? ORDER BY version",
        )?;
        let rows = stmt.query_map([id], version_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Every history record ordered by id, then version.
    pub fn all_history(&self) -> Result<Vec<VersionRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, version, name, address, changed_at
             FROM HistoryData ORDER BY id, version",
        )?;
        let rows = stmt.query_map([], version_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn max_version(&self, id: i64) -> Result<Option<i64>> {
        let max: Option<i64> = self.db.conn().query_row(
            "SELECT MAX(version) FROM HistoryData WHERE id = ?",
            [id],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    pub fn entity_count(&self) -> Result<u64> {
        count(self.db.conn(), "SELECT COUNT(*) FROM MainData")
    }

    pub fn history_count(&self) -> Result<u64> {
        count(self.db.conn(), "SELECT COUNT(*) FROM HistoryData")
    }
}

// =============================================================================
// TRANSACTION-SCOPED OPERATIONS
// =============================================================================
//
// These run against whatever connection or transaction the caller holds, so
// the sync engine can apply many upserts inside a single phase transaction.

pub(crate) fn create_in(
    conn: &Connection,
    id: i64,
    name: &str,
    address: &str,
) -> Result<VersionRecord> {
    let existing: i64 =
        conn.query_row("SELECT COUNT(*) FROM MainData WHERE id = ?", [id], |row| {
            row.get(0)
        })?;
    if existing > 0 {
        debug!(id, "create skipped, id already exists");
        return Err(VsError::DuplicateKey(id));
    }

    conn.execute(
        "INSERT INTO MainData (id, name, address) VALUES (?, ?, ?)",
        params![id, name, address],
    )
    .map_err(|err| duplicate_or_backend(id, err))?;

    insert_history_in(conn, id, 1, name, address)
}

pub(crate) fn update_in(
    conn: &Connection,
    id: i64,
    name: &str,
    address: &str,
) -> Result<VersionRecord> {
    let current = entity_in(conn, id)?.ok_or(VsError::NotFound(id))?;
    let version = next_version_in(conn, id)?;
    let record = insert_history_in(conn, id, version, &current.name, &current.address)?;

    conn.execute(
        "UPDATE MainData SET name = ?, address = ? WHERE id = ?",
        params![name, address, id],
    )?;
    Ok(record)
}

pub(crate) fn upsert_in(
    conn: &Connection,
    id: i64,
    name: &str,
    address: &str,
) -> Result<UpsertOutcome> {
    if entity_in(conn, id)?.is_some() {
        update_in(conn, id, name, address).map(UpsertOutcome::Updated)
    } else {
        create_in(conn, id, name, address).map(UpsertOutcome::Created)
    }
}

fn rollback_in(conn: &Connection, id: i64, version: i64) -> Result<Entity> {
    let snapshot: Option<(String, String)> = conn
        .query_row(
            "SELECT name, address FROM HistoryData WHERE id = ? AND version = ?",
            params![id, version],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let Some((name, address)) = snapshot else {
        return Err(VsError::VersionNotFound { id, version });
    };

    let changed = conn.execute(
        "UPDATE MainData SET name = ?, address = ? WHERE id = ?",
        params![name, address, id],
    )?;
    if changed == 0 {
        return Err(VsError::NotFound(id));
    }
    Ok(Entity { id, name, address })
}

fn entity_in(conn: &Connection, id: i64) -> rusqlite::Result<Option<Entity>> {
    conn.query_row(
        "SELECT id, name, address FROM MainData WHERE id = ?",
        [id],
        entity_from_row,
    )
    .optional()
}

fn next_version_in(conn: &Connection, id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT IFNULL(MAX(version), 0) + 1 FROM HistoryData WHERE id = ?",
        [id],
        |row| row.get(0),
    )
}

fn insert_history_in(
    conn: &Connection,
    id: i64,
    version: i64,
    name: &str,
    address: &str,
) -> Result<VersionRecord> {
    let changed_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    conn.execute(
        "INSERT INTO HistoryData (id, name, address, version, changed_at) VALUES (?, ?, ?, ?, ?)",
        params![id, name, address, version, changed_at],
    )?;
    debug!(id, version, "recorded history version");
    Ok(VersionRecord {
        id,
        version,
        name: name.to_string(),
        address: address.to_string(),
        changed_at,
    })
}

fn count(conn: &Connection, sql: &str) -> Result<u64> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count.max(0).unsigned_abs())
}

fn entity_from_row(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn version_from_row(row: &Row<'_>) -> rusqlite::Result<VersionRecord> {
    Ok(VersionRecord {
        id: row.get(0)?,
        version: row.get(1)?,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        address: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        changed_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

fn duplicate_or_backend(id: i64, err: rusqlite::Error) -> VsError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            ) =>
        {
            VsError::DuplicateKey(id)
        }
        _ => VsError::Database(err),
    }
}

/// Backend errors raised mid-write become transaction failures; domain
/// errors pass through untouched.
pub(crate) fn backend_to_transaction(operation: &str, err: VsError) -> VsError {
    match err {
        VsError::Database(inner) => VsError::transaction(operation, inner),
        other => other,
    }
}
