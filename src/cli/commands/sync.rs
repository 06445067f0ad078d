//! versync sync - Push local entities to the remote, then pull them back

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::config::Config;
use crate::error::Result;
use crate::storage::RetentionPolicy;
use crate::sync::{PruneTarget, ReplicaSynchronizer, SyncOptions, SyncReport};

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Only push local changes
    #[arg(long, conflicts_with = "pull_only")]
    pub push_only: bool,

    /// Only pull remote changes
    #[arg(long, conflicts_with = "push_only")]
    pub pull_only: bool,

    /// Count rows each phase would transfer without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Versions to keep when pruning after sync (default: [retention] keep)
    #[arg(long)]
    pub keep: Option<usize>,

    /// Skip the post-sync prune
    #[arg(long)]
    pub no_prune: bool,
}

impl SyncArgs {
    /// Merge flags over the configured defaults.
    pub fn options(&self, config: &Config) -> Result<SyncOptions> {
        let retention = match self.keep {
            Some(keep) => RetentionPolicy::new(keep)?,
            None => config.retention.policy()?,
        };

        let (push_only, pull_only) = if self.push_only || self.pull_only {
            (self.push_only, self.pull_only)
        } else {
            let direction = config.sync.direction;
            (!direction.allows_pull(), !direction.allows_push())
        };

        let prune_target = if self.no_prune {
            PruneTarget::None
        } else {
            config.sync.prune_after_sync
        };

        Ok(SyncOptions {
            push_only,
            pull_only,
            dry_run: self.dry_run,
            prune_target,
            retention,
        })
    }
}

pub fn run(ctx: &AppContext, args: &SyncArgs) -> Result<()> {
    let options = args.options(&ctx.config)?;
    let report = ReplicaSynchronizer::new(options).sync(&ctx.local, &ctx.remote)?;

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "report": report,
        }));
    }

    emit_human(layout_for(&report));
    Ok(())
}

fn layout_for(report: &SyncReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout
        .title("Sync Report")
        .push_line(report.summary_line())
        .blank()
        .kv("Pushed", &report.pushed.to_string())
        .kv("  new remote", &report.created_remote.to_string())
        .kv("Pulled", &report.pulled.to_string())
        .kv("  new local", &report.created_local.to_string())
        .kv("Duration (ms)", &report.duration_ms.to_string())
        .blank();
    for pruned in &report.pruned {
        layout.prune_report(pruned);
    }
    if report.dry_run {
        layout.push_line("(dry run - no changes made)");
    }
    layout
}
