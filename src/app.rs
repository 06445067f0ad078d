//! Application context shared by CLI commands.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Result, VsError};
use crate::storage::{Database, VersionedStore};

pub struct AppContext {
    pub config: Config,
    pub local: VersionedStore,
    pub remote: VersionedStore,
    pub robot_mode: bool,
}

impl AppContext {
    /// Load configuration, apply CLI path overrides and open both replicas.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::load(cli.config.as_deref(), &cwd)?;
        if let Some(path) = &cli.local {
            config.store.local_path.clone_from(path);
        }
        if let Some(path) = &cli.remote {
            config.store.remote_path.clone_from(path);
        }
        Self::open(config, cli.robot)
    }

    pub fn open(config: Config, robot_mode: bool) -> Result<Self> {
        let local_path = &config.store.local_path;
        let remote_path = &config.store.remote_path;
        if same_file(local_path, remote_path) {
            return Err(VsError::Config(format!(
                "local and remote stores must be different files (both are {})",
                local_path.display()
            )));
        }

        let timeout = config.store.busy_timeout();
        let local =
            VersionedStore::with_label(Database::open_with_timeout(local_path, timeout)?, "local");
        let remote =
            VersionedStore::with_label(Database::open_with_timeout(remote_path, timeout)?, "remote");
        debug!(
            local = %local_path.display(),
            remote = %remote_path.display(),
            "opened replicas"
        );

        Ok(Self {
            config,
            local,
            remote,
            robot_mode,
        })
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    absolute(a) == absolute(b)
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
