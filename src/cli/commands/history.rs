//! versync history - Show recorded versions

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Side;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::storage::{VersionRecord, VersionedStore};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only this id
    #[arg(allow_negative_numbers = true)]
    pub id: Option<i64>,

    /// Replica(s) to read
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,
}

#[derive(Debug, Serialize)]
struct StoreHistory {
    store: String,
    records: Vec<VersionRecord>,
}

pub fn run(ctx: &AppContext, args: &HistoryArgs) -> Result<()> {
    let mut views = Vec::new();
    if args.side.includes_local() {
        views.push(collect(&ctx.local, args.id)?);
    }
    if args.side.includes_remote() {
        views.push(collect(&ctx.remote, args.id)?);
    }

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "stores": views,
        }));
    }

    let mut layout = HumanLayout::new();
    for view in &views {
        layout.section(&format!("{} history ({})", view.store, view.records.len()));
        if view.records.is_empty() {
            layout.push_line("(no versions)");
        }
        for record in &view.records {
            layout.version(record);
        }
        layout.blank();
    }
    emit_human(layout);
    Ok(())
}

fn collect(store: &VersionedStore, id: Option<i64>) -> Result<StoreHistory> {
    let records = match id {
        Some(id) => store.history(id)?,
        None => store.all_history()?,
    };
    Ok(StoreHistory {
        store: store.label().to_string(),
        records,
    })
}
