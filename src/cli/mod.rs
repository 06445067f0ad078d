//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// versync - versioned record store with two-replica sync
#[derive(Parser, Debug)]
#[command(name = "versync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit JSON on stdout instead of formatted text
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ./versync.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local store file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// Remote store file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub remote: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which replica a single-store command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Side {
    #[default]
    Local,
    Remote,
    Both,
}

impl Side {
    pub const fn includes_local(self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    pub const fn includes_remote(self) -> bool {
        matches!(self, Self::Remote | Self::Both)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create both store files and apply the schema
    Init(commands::init::InitArgs),

    /// Insert a new entity at version 1
    Create(commands::EntityArgs),

    /// Change an entity, archiving its prior state
    Update(commands::EntityArgs),

    /// Update the entity if it exists, otherwise create it
    Upsert(commands::EntityArgs),

    /// Restore an entity to a recorded version
    Rollback(commands::rollback::RollbackArgs),

    /// Show current entities
    Show(commands::show::ShowArgs),

    /// Show recorded versions
    History(commands::history::HistoryArgs),

    /// Trim history to the newest N versions per id
    Prune(commands::prune::PruneArgs),

    /// Push local entities to the remote, then pull remote entities back
    Sync(commands::sync::SyncArgs),
}
