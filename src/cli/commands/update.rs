//! versync update - Change an entity, archiving its prior state

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

use super::EntityArgs;

pub fn run(ctx: &AppContext, args: &EntityArgs) -> Result<()> {
    let store = args.store.select(ctx);
    let archived = store.update(args.id, &args.name, &args.address)?;

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "store": store.label(),
            "action": "updated",
            "archived": archived,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .push_line(format!(
            "Updated entity {} in {}; previous state archived as v{}",
            archived.id,
            store.label(),
            archived.version
        ))
        .version(&archived);
    emit_human(layout);
    Ok(())
}
