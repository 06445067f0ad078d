//! Two-replica synchronization.

pub mod config;
pub mod engine;
pub mod replica;

pub use config::{PruneTarget, SyncDirection, SyncSettings};
pub use engine::{ReplicaSynchronizer, SyncOptions, SyncPhase, SyncReport};
pub use replica::{EntitySink, Replica};
