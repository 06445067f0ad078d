//! versync: a versioned record store with a full history table, top-N
//! retention, and push-then-pull synchronization between two replicas.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod sync;
pub mod test_utils;

pub use error::{Result, VsError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
