//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;
use crate::storage::VersionedStore;

pub mod create;
pub mod history;
pub mod init;
pub mod prune;
pub mod rollback;
pub mod show;
pub mod sync;
pub mod update;
pub mod upsert;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Create(args) => create::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
        Commands::Upsert(args) => upsert::run(ctx, args),
        Commands::Rollback(args) => rollback::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::History(args) => history::run(ctx, args),
        Commands::Prune(args) => prune::run(ctx, args),
        Commands::Sync(args) => sync::run(ctx, args),
    }
}

/// Replica a write command goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Store {
    #[default]
    Local,
    Remote,
}

impl Store {
    pub const fn select(self, ctx: &AppContext) -> &VersionedStore {
        match self {
            Self::Local => &ctx.local,
            Self::Remote => &ctx.remote,
        }
    }
}

/// Shared arguments for create, update and upsert.
#[derive(Args, Debug, Clone)]
pub struct EntityArgs {
    /// Entity id
    #[arg(allow_negative_numbers = true)]
    pub id: i64,

    /// Name column
    pub name: String,

    /// Address column
    pub address: String,

    /// Replica to write to
    #[arg(long, value_enum, default_value_t = Store::Local)]
    pub store: Store,
}
