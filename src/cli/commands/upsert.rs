//! versync upsert - Update the entity if it exists, otherwise create it

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::storage::UpsertOutcome;

use super::EntityArgs;

pub fn run(ctx: &AppContext, args: &EntityArgs) -> Result<()> {
    let store = args.store.select(ctx);
    let outcome = store.upsert(args.id, &args.name, &args.address)?;

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "store": store.label(),
            "outcome": outcome,
        }));
    }

    let verb = match outcome {
        UpsertOutcome::Created(_) => "Created",
        UpsertOutcome::Updated(_) => "Updated",
    };
    let mut layout = HumanLayout::new();
    layout
        .push_line(format!("{verb} entity {} in {}", args.id, store.label()))
        .version(outcome.record());
    emit_human(layout);
    Ok(())
}
