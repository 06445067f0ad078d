use std::path::PathBuf;

use tempfile::TempDir;

use crate::config::Config;
use crate::storage::{Database, VersionedStore};

/// Two file-backed replicas in an isolated temp directory.
pub struct ReplicaFixture {
    pub temp_dir: TempDir,
    pub local_path: PathBuf,
    pub remote_path: PathBuf,
}

impl Default for ReplicaFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicaFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let local_path = temp_dir.path().join("VersionControlDB.sqlite");
        let remote_path = temp_dir.path().join("VersionControlDBServer.sqlite");

        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());

        Self {
            temp_dir,
            local_path,
            remote_path,
        }
    }

    /// Open (or reopen) the local replica.
    pub fn local(&self) -> VersionedStore {
        VersionedStore::with_label(
            Database::open(&self.local_path).expect("Failed to open local store"),
            "local",
        )
    }

    /// Open (or reopen) the remote replica.
    pub fn remote(&self) -> VersionedStore {
        VersionedStore::with_label(
            Database::open(&self.remote_path).expect("Failed to open remote store"),
            "remote",
        )
    }

    /// Default config pointing at this fixture's files.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.store.local_path.clone_from(&self.local_path);
        config.store.remote_path.clone_from(&self.remote_path);
        config
    }

    /// Write `contents` to `versync.toml` inside the temp directory.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(crate::config::PROJECT_CONFIG_FILE);
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }
}

impl Drop for ReplicaFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.temp_dir.path());
    }
}
