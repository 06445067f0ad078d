//! Replica abstraction used by the synchronizer.
//!
//! A replica can stream its entity rows and can accept a batch of upserts
//! inside one transaction. The SQLite [`VersionedStore`] is the only
//! implementation today.

use rusqlite::Connection;

use crate::error::Result;
use crate::storage::sqlite::Database;
use crate::storage::versioned::{backend_to_transaction, upsert_in};
use crate::storage::{Entity, PruneReport, RetentionPolicy, UpsertOutcome, VersionedStore};

/// Receives upserts inside a replica's open transaction.
pub trait EntitySink {
    fn upsert(&mut self, entity: &Entity) -> Result<UpsertOutcome>;
}

pub trait Replica {
    /// Name used in logs and reports.
    fn label(&self) -> &str;

    /// Stream every entity to `visit`, one row at a time. Stops at the first error.
    fn scan(&self, visit: &mut dyn FnMut(Entity) -> Result<()>) -> Result<u64>;

    /// Run `apply` inside a single transaction, committing only if it succeeds.
    fn receive(
        &self,
        operation: &str,
        apply: &mut dyn FnMut(&mut dyn EntitySink) -> Result<()>,
    ) -> Result<()>;

    fn prune(&self, policy: &RetentionPolicy) -> Result<PruneReport>;
}

struct TransactionSink<'a> {
    conn: &'a Connection,
}

impl EntitySink for TransactionSink<'_> {
    fn upsert(&mut self, entity: &Entity) -> Result<UpsertOutcome> {
        upsert_in(self.conn, entity.id, &entity.name, &entity.address)
    }
}

impl Replica for VersionedStore {
    fn label(&self) -> &str {
        Self::label(self)
    }

    fn scan(&self, visit: &mut dyn FnMut(Entity) -> Result<()>) -> Result<u64> {
        self.for_each_entity(visit)
    }

    fn receive(
        &self,
        operation: &str,
        apply: &mut dyn FnMut(&mut dyn EntitySink) -> Result<()>,
    ) -> Result<()> {
        let tx = self.db().begin(operation)?;
        let mut sink = TransactionSink { conn: &*tx };
        apply(&mut sink).map_err(|err| backend_to_transaction(operation, err))?;
        Database::commit(tx, operation)
    }

    fn prune(&self, policy: &RetentionPolicy) -> Result<PruneReport> {
        policy.prune(self)
    }
}
