//! Property-based tests for store, retention and sync invariants.

mod store_props;
mod sync_props;
