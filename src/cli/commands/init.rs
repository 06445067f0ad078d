//! versync init - Create both store files and apply the schema

use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::config::PROJECT_CONFIG_FILE;
use crate::error::{Result, VsError};
use crate::storage::VersionedStore;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Run SQLite's integrity check on both files
    #[arg(long)]
    pub check: bool,

    /// Write the effective configuration to ./versync.toml if it does not exist
    #[arg(long)]
    pub write_config: bool,
}

#[derive(Debug, Serialize)]
struct StoreStatus {
    label: String,
    path: String,
    schema_version: u32,
    entities: u64,
    history_rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    integrity_ok: Option<bool>,
}

impl StoreStatus {
    fn collect(store: &VersionedStore, check: bool) -> Result<Self> {
        let integrity_ok = if check {
            Some(store.db().integrity_check()?)
        } else {
            None
        };
        Ok(Self {
            label: store.label().to_string(),
            path: store.db().locator().to_string(),
            schema_version: store.db().schema_version(),
            entities: store.entity_count()?,
            history_rows: store.history_count()?,
            integrity_ok,
        })
    }
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let stores = vec![
        StoreStatus::collect(&ctx.local, args.check)?,
        StoreStatus::collect(&ctx.remote, args.check)?,
    ];

    let config_written = if args.write_config {
        write_config(ctx, Path::new(PROJECT_CONFIG_FILE))?
    } else {
        false
    };

    if ctx.robot_mode {
        return emit_json(&serde_json::json!({
            "status": "ok",
            "stores": stores,
            "config_written": config_written,
        }));
    }

    let mut layout = HumanLayout::new();
    layout.title("Stores ready");
    for status in &stores {
        layout
            .section(&status.label)
            .kv("Path", &status.path)
            .kv("Schema", &format!("v{}", status.schema_version))
            .kv("Entities", &status.entities.to_string())
            .kv("History rows", &status.history_rows.to_string());
        if let Some(ok) = status.integrity_ok {
            layout.kv("Integrity", if ok { "ok" } else { "FAILED" });
        }
        layout.blank();
    }
    if config_written {
        layout.push_line(format!("Wrote {PROJECT_CONFIG_FILE}"));
    }
    emit_human(layout);

    if stores.iter().any(|s| s.integrity_ok == Some(false)) {
        return Err(VsError::Config("integrity check failed".to_string()));
    }
    Ok(())
}

fn write_config(ctx: &AppContext, path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let raw = toml::to_string_pretty(&ctx.config)
        .map_err(|err| VsError::Config(format!("serialize config: {err}")))?;
    std::fs::write(path, raw)?;
    Ok(true)
}
