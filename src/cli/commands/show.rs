//! versync show - Show current entities

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Side;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::{Result, VsError};
use crate::storage::{Entity, VersionedStore};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only this id
    #[arg(allow_negative_numbers = true)]
    pub id: Option<i64>,

    /// Replica(s) to read
    #[arg(long, value_enum, default_value_t = Side::Both)]
    pub side: Side,
}

#[derive(Debug, Serialize)]
struct StoreEntities {
    store: String,
    entities: Vec<Entity>,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let mut views = Vec::new();
    if args.side.includes_local() {
        views.push(collect(&ctx.local, args.id)?);
    }
    if args.side.includes_remote() {
        views.push(collect(&ctx.remote, args.id)?);
    }

    if let Some(id) = args.id {
        if views.iter().all(|view| view.entities.is_empty()) {
            return Err(VsError::NotFound(id));
        }
    }

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "stores": views,
        }));
    }

    let mut layout = HumanLayout::new();
    for view in &views {
        layout.section(&format!("{} ({})", view.store, view.entities.len()));
        if view.entities.is_empty() {
            layout.push_line("(empty)");
        }
        for entity in &view.entities {
            layout.entity(entity);
        }
        layout.blank();
    }
    emit_human(layout);
    Ok(())
}

fn collect(store: &VersionedStore, id: Option<i64>) -> Result<StoreEntities> {
    let entities = match id {
        Some(id) => store.get(id)?.into_iter().collect(),
        None => store.entities()?,
    };
    Ok(StoreEntities {
        store: store.label().to_string(),
        entities,
    })
}
