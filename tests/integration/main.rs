//! Integration suite: file-backed replicas exercised through the library.

mod recovery_tests;
mod retention_tests;
mod sync_scenarios;
