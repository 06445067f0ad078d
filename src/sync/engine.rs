use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, VsError};
use crate::storage::{PruneReport, RetentionPolicy};

use super::config::PruneTarget;
use super::replica::Replica;

/// Half of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// local → remote
    Push,
    /// remote → local
    Pull,
}

impl SyncPhase {
    const fn operation(self) -> &'static str {
        match self {
            Self::Push => "sync push",
            Self::Pull => "sync pull",
        }
    }
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pull => write!(f, "pull"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub push_only: bool,
    pub pull_only: bool,
    /// Count the rows each phase would transfer without writing anything.
    pub dry_run: bool,
    /// Replica(s) whose history is trimmed after both phases succeed.
    pub prune_target: PruneTarget,
    pub retention: RetentionPolicy,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub local: String,
    pub remote: String,
    /// Rows upserted into the remote replica.
    pub pushed: u64,
    /// Rows upserted into the local replica.
    pub pulled: u64,
    pub created_remote: u64,
    pub created_local: u64,
    pub pruned: Vec<PruneReport>,
    pub dry_run: bool,
    pub duration_ms: u128,
}

impl SyncReport {
    #[must_use]
    pub fn summary_line(&self) -> String {
        let pruned: usize = self.pruned.iter().map(|r| r.rows_deleted).sum();
        format!(
            "{} ⇄ {}: ↑{} (+{}) ↓{} (+{}) ✂{}",
            self.local,
            self.remote,
            self.pushed,
            self.created_remote,
            self.pulled,
            self.created_local,
            pruned
        )
    }
}

#[derive(Debug, Default)]
struct PhaseTally {
    rows: u64,
    created: u64,
}

/// Push-then-pull reconciliation of two replicas.
///
/// The push phase upserts every local entity into the remote, the pull phase
/// then upserts every remote entity (pushed rows included) back into the
/// local replica. Phase order is the conflict rule: an id present on both
/// sides ends with whatever the last phase to touch it carried. Each phase
/// is a single transaction on its receiving replica; a failed row aborts
/// that phase.
#[derive(Debug, Clone, Default)]
pub struct ReplicaSynchronizer {
    options: SyncOptions,
}

impl ReplicaSynchronizer {
    pub const fn new(options: SyncOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn sync(&self, local: &dyn Replica, remote: &dyn Replica) -> Result<SyncReport> {
        if self.options.push_only && self.options.pull_only {
            return Err(VsError::Config(
                "push-only and pull-only cannot be combined".to_string(),
            ));
        }

        let start = Instant::now();
        let mut report = SyncReport {
            local: local.label().to_string(),
            remote: remote.label().to_string(),
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        if self.options.dry_run {
            self.plan(local, remote, &mut report)?;
        } else {
            if !self.options.pull_only {
                let tally = self.transfer(SyncPhase::Push, local, remote)?;
                report.pushed = tally.rows;
                report.created_remote = tally.created;
            }

            if !self.options.push_only {
                let tally = self.transfer(SyncPhase::Pull, remote, local)?;
                report.pulled = tally.rows;
                report.created_local = tally.created;
            }

            let target = self.options.prune_target;
            if target.includes_remote() {
                report.pruned.push(remote.prune(&self.options.retention)?);
            }
            if target.includes_local() {
                report.pruned.push(local.prune(&self.options.retention)?);
            }
        }

        report.duration_ms = start.elapsed().as_millis();
        info!(
            local = %report.local,
            remote = %report.remote,
            pushed = report.pushed,
            pulled = report.pulled,
            dry_run = report.dry_run,
            "sync complete"
        );
        Ok(report)
    }

    /// Fill in the counts a real pass would report, reading both replicas'
    /// ids and writing nothing. The pull phase sees the remote after the push,
    /// so it carries the union of both id sets.
    fn plan(
        &self,
        local: &dyn Replica,
        remote: &dyn Replica,
        report: &mut SyncReport,
    ) -> Result<()> {
        let local_ids =
            collect_ids(local).map_err(|err| transfer_failure(SyncPhase::Push, None, &err))?;
        let remote_ids =
            collect_ids(remote).map_err(|err| transfer_failure(SyncPhase::Pull, None, &err))?;

        let mut incoming = remote_ids;
        if !self.options.pull_only {
            report.pushed = local_ids.len() as u64;
            report.created_remote = local_ids.difference(&incoming).count() as u64;
            incoming.extend(local_ids.iter().copied());
        }
        if !self.options.push_only {
            report.pulled = incoming.len() as u64;
            report.created_local = incoming.difference(&local_ids).count() as u64;
        }

        debug!(pushed = report.pushed, pulled = report.pulled, "dry run planned");
        Ok(())
    }

    fn transfer(
        &self,
        phase: SyncPhase,
        source: &dyn Replica,
        target: &dyn Replica,
    ) -> Result<PhaseTally> {
        debug!(%phase, source = source.label(), target = target.label(), "starting phase");

        let mut tally = PhaseTally::default();
        let mut failed_id = None;
        let result = target.receive(phase.operation(), &mut |sink| {
            source.scan(&mut |entity| match sink.upsert(&entity) {
                Ok(outcome) => {
                    tally.rows += 1;
                    if outcome.is_created() {
                        tally.created += 1;
                    }
                    debug!(%phase, id = entity.id, version = outcome.record().version, "transferred row");
                    Ok(())
                }
                Err(err) => {
                    failed_id = Some(entity.id);
                    Err(err)
                }
            })?;
            Ok(())
        });

        if let Err(err) = result {
            warn!(%phase, id = ?failed_id, error = %err, "phase rolled back");
            return Err(transfer_failure(phase, failed_id, &err));
        }

        info!(%phase, rows = tally.rows, created = tally.created, "phase committed");
        Ok(tally)
    }
}

fn collect_ids(replica: &dyn Replica) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    replica.scan(&mut |entity| {
        ids.insert(entity.id);
        Ok(())
    })?;
    Ok(ids)
}

fn transfer_failure(phase: SyncPhase, id: Option<i64>, err: &VsError) -> VsError {
    VsError::TransferFailure {
        phase: phase.to_string(),
        id,
        reason: err.to_string(),
    }
}
