use serde::{Deserialize, Serialize};

use crate::error::{Result, VsError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    PullOnly,
    PushOnly,
    #[default]
    Bidirectional,
}

impl SyncDirection {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pull-only" | "pull" => Ok(Self::PullOnly),
            "push-only" | "push" => Ok(Self::PushOnly),
            "bidirectional" | "bi" | "both" => Ok(Self::Bidirectional),
            _ => Err(VsError::Config(format!(
                "unknown sync direction: {value} (use pull-only|push-only|bidirectional)"
            ))),
        }
    }

    pub const fn allows_pull(self) -> bool {
        matches!(self, Self::PullOnly | Self::Bidirectional)
    }

    pub const fn allows_push(self) -> bool {
        matches!(self, Self::PushOnly | Self::Bidirectional)
    }
}

/// Which replica gets its history trimmed once a sync completes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PruneTarget {
    #[default]
    None,
    Local,
    Remote,
    Both,
}

impl PruneTarget {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" | "off" => Ok(Self::None),
            "local" => Ok(Self::Local),
            "remote" | "server" => Ok(Self::Remote),
            "both" | "all" => Ok(Self::Both),
            _ => Err(VsError::Config(format!(
                "unknown prune target: {value} (use none|local|remote|both)"
            ))),
        }
    }

    pub const fn includes_local(self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    pub const fn includes_remote(self) -> bool {
        matches!(self, Self::Remote | Self::Both)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncSettings {
    #[serde(default)]
    pub direction: SyncDirection,
    #[serde(default = "default_prune_after_sync")]
    pub prune_after_sync: PruneTarget,
}

const fn default_prune_after_sync() -> PruneTarget {
    PruneTarget::Remote
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            direction: SyncDirection::default(),
            prune_after_sync: default_prune_after_sync(),
        }
    }
}
