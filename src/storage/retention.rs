//! History retention
//!
//! Keeps only the newest `keep` versions of every id in `HistoryData`.
//! The sweep runs in one transaction: either every id is trimmed or none is.

use std::collections::BTreeMap;

use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, VsError};
use crate::storage::sqlite::Database;
use crate::storage::versioned::{VersionedStore, backend_to_transaction};

/// Versions kept per id when nothing else is configured.
pub const DEFAULT_KEEP: usize = 5;

/// Outcome of one retention sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub store: String,
    pub keep: usize,
    pub ids_scanned: usize,
    pub rows_deleted: usize,
    /// Rows removed per id; ids with nothing to remove are omitted.
    pub deleted_by_id: BTreeMap<i64, usize>,
    pub dry_run: bool,
}

/// Keep-the-newest-N retention over a store's history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    keep: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { keep: DEFAULT_KEEP }
    }
}

impl RetentionPolicy {
    /// `keep` must be at least 1 so the newest snapshot always survives.
    pub fn new(keep: usize) -> Result<Self> {
        if keep == 0 {
            return Err(VsError::Config(
                "retention keep must be at least 1".to_string(),
            ));
        }
        Ok(Self { keep })
    }

    pub const fn keep(&self) -> usize {
        self.keep
    }

    /// Delete every history row outside each id's `keep` highest versions.
    pub fn prune(&self, store: &VersionedStore) -> Result<PruneReport> {
        let operation = "prune";
        let tx = store.db().begin(operation)?;
        let report = self
            .sweep(&tx, store.label(), false)
            .map_err(|err| backend_to_transaction(operation, err))?;
        Database::commit(tx, operation)?;

        info!(
            store = %report.store,
            keep = self.keep,
            ids = report.ids_scanned,
            deleted = report.rows_deleted,
            "pruned history"
        );
        Ok(report)
    }

    /// Report what [`RetentionPolicy::prune`] would delete without writing.
    pub fn preview(&self, store: &VersionedStore) -> Result<PruneReport> {
        self.sweep(store.db().conn(), store.label(), true)
    }

    fn sweep(&self, conn: &Connection, label: &str, dry_run: bool) -> Result<PruneReport> {
        let keep = i64::try_from(self.keep)
            .map_err(|_| VsError::Config(format!("retention keep too large: {}", self.keep)))?;

        let ids = distinct_ids(conn)?;
        let mut report = PruneReport {
            store: label.to_string(),
            keep: self.keep,
            ids_scanned: ids.len(),
            dry_run,
            ..Default::default()
        };

        let sql = if dry_run {
            "SELECT COUNT(*) FROM HistoryData
             WHERE id = ?1 AND version NOT IN (
                 SELECT version FROM HistoryData WHERE id = ?1 ORDER BY version DESC LIMIT ?2
             )"
        } else {
            "DELETE FROM HistoryData
             WHERE id = ?1 AND version NOT IN (
                 SELECT version FROM HistoryData WHERE id = ?1 ORDER BY version DESC LIMIT ?2
             )"
        };
        let mut stmt = conn.prepare(sql)?;

        for id in ids {
            let removed = if dry_run {
                let n: i64 = stmt.query_row(params![id, keep], |row| row.get(0))?;
                usize::try_from(n).unwrap_or(0)
            } else {
                stmt.execute(params![id, keep])?
            };
            debug!(id, removed, "processed history id");
            if removed > 0 {
                report.rows_deleted += removed;
                report.deleted_by_id.insert(id, removed);
            }
        }

        Ok(report)
    }
}

fn distinct_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT DISTINCT id FROM HistoryData ORDER BY id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}
