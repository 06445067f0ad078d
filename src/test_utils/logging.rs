use std::time::Instant;

use crate::storage::VersionedStore;

/// Prints a framed, timed trace of one test to stdout.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
}

impl TestLogger {
    pub fn new(test_name: &str) -> Self {
        let separator = "=".repeat(60);
        println!("\n{separator}");
        println!("[TEST START] {test_name}");
        println!("{separator}");
        Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn step(&self, description: &str) {
        println!("[STEP +{:?}] {description}", self.start_time.elapsed());
    }

    pub fn log_input<T: std::fmt::Debug>(&self, name: &str, value: &T) {
        println!("[INPUT] {name}: {value:?}");
    }

    /// Dump entity and history rows of a store.
    pub fn log_store(&self, store: &VersionedStore) {
        println!("[STORE] {}", store.label());
        match store.entities() {
            Ok(entities) => {
                for entity in entities {
                    println!("  entity {:>4}  {} | {}", entity.id, entity.name, entity.address);
                }
            }
            Err(err) => println!("  entities unavailable: {err}"),
        }
        match store.all_history() {
            Ok(records) => {
                for record in records {
                    println!(
                        "  history {:>3} v{:<3} {} | {}",
                        record.id, record.version, record.name, record.address
                    );
                }
            }
            Err(err) => println!("  history unavailable: {err}"),
        }
    }

    pub fn pass(&self) {
        println!("[RESULT] {} PASSED in {:?}", self.test_name, self.start_time.elapsed());
        println!("{}\n", "=".repeat(60));
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }
}
