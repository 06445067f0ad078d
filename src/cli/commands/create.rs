//! versync create - Insert a new entity at version 1

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

use super::EntityArgs;

pub fn run(ctx: &AppContext, args: &EntityArgs) -> Result<()> {
    let store = args.store.select(ctx);
    let record = store.create(args.id, &args.name, &args.address)?;

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "store": store.label(),
            "action": "created",
            "record": record,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .push_line(format!("Created entity {} in {}", record.id, store.label()))
        .version(&record);
    emit_human(layout);
    Ok(())
}
