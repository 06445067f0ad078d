//! versync prune - Trim history to the newest N versions per id

use clap::Args;

use crate::app::AppContext;
use crate::cli::Side;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::storage::{RetentionPolicy, VersionedStore};

#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Versions to keep per id (default: [retention] keep)
    #[arg(long)]
    pub keep: Option<usize>,

    /// Replica(s) to prune
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,

    /// Report what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(ctx: &AppContext, args: &PruneArgs) -> Result<()> {
    let policy = match args.keep {
        Some(keep) => RetentionPolicy::new(keep)?,
        None => ctx.config.retention.policy()?,
    };

    let mut targets: Vec<&VersionedStore> = Vec::new();
    if args.side.includes_local() {
        targets.push(&ctx.local);
    }
    if args.side.includes_remote() {
        targets.push(&ctx.remote);
    }

    let mut reports = Vec::with_capacity(targets.len());
    for store in targets {
        let report = if args.dry_run {
            policy.preview(store)?
        } else {
            policy.prune(store)?
        };
        reports.push(report);
    }

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "keep": policy.keep(),
            "dry_run": args.dry_run,
            "reports": reports,
        }));
    }

    let mut layout = HumanLayout::new();
    layout.title(&format!("Keep newest {} versions per id", policy.keep()));
    for report in &reports {
        layout.prune_report(report);
    }
    if args.dry_run {
        layout.push_line("(dry run - no changes made)");
    }
    emit_human(layout);
    Ok(())
}
