use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VsError};
use crate::storage::RetentionPolicy;
use crate::storage::retention::DEFAULT_KEEP;
use crate::sync::{PruneTarget, SyncDirection, SyncSettings};

/// File name searched for in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "versync.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Config {
    /// Load configuration from an explicit path, `$VERSYNC_CONFIG`, or
    /// `versync.toml` under `cwd`, then apply `VERSYNC_*` overrides.
    pub fn load(explicit_path: Option<&Path>, cwd: &Path) -> Result<Self> {
        Self::load_with_env(explicit_path, cwd, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(explicit_path: Option<&Path>, cwd: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("VERSYNC_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            // A named file has to exist; the project file is optional.
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(VsError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
            }
        } else if let Some(project) = Self::load_patch(&cwd.join(PROJECT_CONFIG_FILE))? {
            config.merge_patch(project);
        }

        config.apply_env_overrides(&env)?;
        config.validate()?;

        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| VsError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| VsError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.store {
            self.store.merge(patch);
        }
        if let Some(patch) = patch.retention {
            self.retention.merge(patch);
        }
        if let Some(patch) = patch.sync {
            if let Some(value) = patch.direction {
                self.sync.direction = value;
            }
            if let Some(value) = patch.prune_after_sync {
                self.sync.prune_after_sync = value;
            }
        }
    }

    fn apply_env_overrides<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("VERSYNC_LOCAL_DB") {
            self.store.local_path = PathBuf::from(value);
        }
        if let Some(value) = env("VERSYNC_REMOTE_DB") {
            self.store.remote_path = PathBuf::from(value);
        }
        if let Some(value) = env_parse::<usize, _>(env, "VERSYNC_RETENTION_KEEP")? {
            self.retention.keep = value;
        }
        if let Some(value) = env_parse::<u64, _>(env, "VERSYNC_BUSY_TIMEOUT_MS")? {
            self.store.busy_timeout_ms = value;
        }
        if let Some(value) = env("VERSYNC_PRUNE_AFTER_SYNC") {
            self.sync.prune_after_sync = parse_prune_after_sync(&value)?;
        }
        if let Some(value) = env("VERSYNC_SYNC_DIRECTION") {
            self.sync.direction = SyncDirection::parse(value.trim())?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.retention.policy()?;
        if self.store.local_path.as_os_str().is_empty()
            || self.store.remote_path.as_os_str().is_empty()
        {
            return Err(VsError::Config("store paths must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub local_path: PathBuf,
    pub remote_path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from("VersionControlDB.sqlite"),
            remote_path: PathBuf::from("VersionControlDBServer.sqlite"),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    fn merge(&mut self, patch: StorePatch) {
        if let Some(value) = patch.local_path {
            self.local_path = value;
        }
        if let Some(value) = patch.remote_path {
            self.remote_path = value;
        }
        if let Some(value) = patch.busy_timeout_ms {
            self.busy_timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Versions kept per id.
    pub keep: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { keep: DEFAULT_KEEP }
    }
}

impl RetentionConfig {
    pub fn policy(&self) -> Result<RetentionPolicy> {
        RetentionPolicy::new(self.keep)
    }

    fn merge(&mut self, patch: RetentionPatch) {
        if let Some(value) = patch.keep {
            self.keep = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub store: Option<StorePatch>,
    pub retention: Option<RetentionPatch>,
    pub sync: Option<SyncPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorePatch {
    pub local_path: Option<PathBuf>,
    pub remote_path: Option<PathBuf>,
    pub busy_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RetentionPatch {
    pub keep: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SyncPatch {
    pub direction: Option<SyncDirection>,
    pub prune_after_sync: Option<PruneTarget>,
}

fn parse_prune_after_sync(value: &str) -> Result<PruneTarget> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(PruneTarget::Remote),
        "0" | "false" | "no" => Ok(PruneTarget::None),
        other => PruneTarget::parse(other),
    }
}

fn env_parse<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| VsError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
