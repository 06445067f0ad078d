//! SQLite connection gateway
//!
//! Opens a store locator, applies pragmas and migrations, and hands out
//! scoped transactions to the versioned store and retention sweep.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use tracing::{debug, warn};

use crate::error::{Result, VsError};
use crate::storage::migrations;

/// Lock wait used when a caller does not configure one.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database wrapper for one replica
pub struct Database {
    conn: Connection,
    locator: String,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("locator", &self.locator)
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open database at the given path with an explicit lock wait.
    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        let locator = path.display().to_string();

        if !path.exists() {
            warn!(path = %locator, "database file does not exist, creating it");
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| connection_failure(&locator, err))?;
            }
        }

        let conn = Connection::open(path).map_err(|err| connection_failure(&locator, err))?;
        conn.busy_timeout(busy_timeout)
            .map_err(|err| connection_failure(&locator, err))?;
        Self::configure_pragmas(&conn).map_err(|err| connection_failure(&locator, err))?;

        Self::finish_open(conn, locator)
    }

    /// Open a private in-memory database. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let locator = ":memory:".to_string();
        let conn =
            Connection::open_in_memory().map_err(|err| connection_failure(&locator, err))?;
        Self::finish_open(conn, locator)
    }

    fn finish_open(conn: Connection, locator: String) -> Result<Self> {
        let schema_version =
            migrations::run_migrations(&conn).map_err(|err| connection_failure(&locator, err))?;
        debug!(locator = %locator, schema_version, "opened store");
        Ok(Self {
            conn,
            locator,
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Path (or `:memory:`) this database was opened from.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Current schema version after migrations.
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Begin a scoped transaction. Dropping it without [`Database::commit`]
    /// rolls back every write made through it.
    pub fn begin(&self, operation: &str) -> Result<Transaction<'_>> {
        self.conn
            .unchecked_transaction()
            .map_err(|err| VsError::transaction(operation, err))
    }

    /// Commit a transaction opened with [`Database::begin`].
    pub fn commit(tx: Transaction<'_>, operation: &str) -> Result<()> {
        tx.commit().map_err(|err| VsError::transaction(operation, err))
    }

    /// Run SQLite integrity check
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    fn configure_pragmas(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;",
        )
    }
}

fn connection_failure(locator: &str, err: impl std::fmt::Display) -> VsError {
    VsError::ConnectionFailure {
        locator: locator.to_string(),
        reason: err.to_string(),
    }
}
