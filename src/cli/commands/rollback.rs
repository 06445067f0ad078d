//! versync rollback - Restore an entity to a recorded version

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

use super::Store;

#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Entity id
    #[arg(allow_negative_numbers = true)]
    pub id: i64,

    /// Version to restore
    #[arg(id = "target_version", value_name = "VERSION")]
    pub version: i64,

    /// Replica to roll back
    #[arg(long, value_enum, default_value_t = Store::Local)]
    pub store: Store,
}

pub fn run(ctx: &AppContext, args: &RollbackArgs) -> Result<()> {
    let store = args.store.select(ctx);
    let entity = store.rollback(args.id, args.version)?;

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "store": store.label(),
            "restored_version": args.version,
            "entity": entity,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .push_line(format!(
            "Rolled back entity {} in {} to v{}",
            entity.id,
            store.label(),
            args.version
        ))
        .entity(&entity);
    emit_human(layout);
    Ok(())
}
