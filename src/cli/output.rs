use console::style;
use serde::Serialize;

use crate::error::{Result, StructuredError, VsError};
use crate::storage::{Entity, PruneReport, VersionRecord};

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Robot-mode error payload written to stdout.
pub fn emit_error_json(err: &VsError) {
    let structured = StructuredError::from_vs_error(err);
    match serde_json::to_string(&structured) {
        Ok(payload) => println!("{payload}"),
        Err(_) => println!(
            "{{\"error\":true,\"code\":\"{}\",\"message\":\"serialization failed\"}}",
            structured.code_string
        ),
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", style(padded).dim()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn entity(&mut self, entity: &Entity) -> &mut Self {
        self.push_line(format!(
            "{:>6}  {}  {}",
            style(entity.id).cyan(),
            entity.name,
            style(&entity.address).dim()
        ))
    }

    pub fn version(&mut self, record: &VersionRecord) -> &mut Self {
        self.push_line(format!(
            "{:>6}  v{:<4} {}  {}  {}",
            style(record.id).cyan(),
            record.version,
            style(&record.changed_at).dim(),
            or_dash(&record.name),
            or_dash(&record.address),
        ))
    }

    pub fn prune_report(&mut self, report: &PruneReport) -> &mut Self {
        let verb = if report.dry_run { "Would delete" } else { "Deleted" };
        self.section(&report.store)
            .kv("Keep", &report.keep.to_string())
            .kv("Ids scanned", &report.ids_scanned.to_string())
            .kv(verb, &report.rows_deleted.to_string());
        for (id, removed) in &report.deleted_by_id {
            self.bullet(&format!("id {id}: {removed}"));
        }
        self.blank()
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
