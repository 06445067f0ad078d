//! Storage layer for versync
//!
//! SQLite-backed entity and history tables, plus the retention sweep.

pub mod migrations;
pub mod retention;
pub mod sqlite;
pub mod versioned;

pub use retention::{PruneReport, RetentionPolicy};
pub use sqlite::Database;
pub use versioned::{Entity, UpsertOutcome, VersionRecord, VersionedStore};
