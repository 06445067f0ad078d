//! Shared test utilities for versync.

pub mod fixtures;
pub mod logging;

#[cfg(test)]
pub mod arbitrary;

pub use fixtures::ReplicaFixture;
pub use logging::TestLogger;
