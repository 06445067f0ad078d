use versync::storage::Entity;
use versync::sync::{PruneTarget, ReplicaSynchronizer, SyncOptions};
use versync::test_utils::{ReplicaFixture, TestLogger};

use super::state::StoreStateChecker;

fn full_sync(fixture: &ReplicaFixture) -> versync::sync::SyncReport {
    ReplicaSynchronizer::default()
        .sync(&fixture.local(), &fixture.remote())
        .unwrap()
}

#[test]
fn test_sync_between_files_survives_reopen() {
    let log = TestLogger::new("test_sync_between_files_survives_reopen");
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "John", "123 Street").unwrap();
    fixture.remote().create(2, "Jane", "456 Avenue").unwrap();

    log.step("first sync");
    let report = full_sync(&fixture);
    log.log_input("report", &report);
    assert_eq!(report.pushed, 1);
    assert_eq!(report.pulled, 2);

    let local = StoreStateChecker::open(&fixture.local_path);
    let remote = StoreStateChecker::open(&fixture.remote_path);
    assert_eq!(local.entity_count(), 2);
    assert_eq!(remote.entity_count(), 2);
    assert_eq!(local.entity(2), Some(("Jane".to_string(), "456 Avenue".to_string())));
    log.log_store(&fixture.local());
    log.pass();
}

#[test]
fn test_resync_is_stable_at_entity_level() {
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "John", "A").unwrap();
    fixture.remote().create(2, "Jane", "B").unwrap();

    full_sync(&fixture);
    let first = fixture.local().entities().unwrap();
    full_sync(&fixture);
    full_sync(&fixture);

    assert_eq!(fixture.local().entities().unwrap(), first);
    assert_eq!(fixture.remote().entities().unwrap(), first);
}

#[test]
fn test_each_sync_appends_history_on_both_sides() {
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "John", "A").unwrap();

    let options = SyncOptions {
        prune_target: PruneTarget::None,
        ..Default::default()
    };
    let synchronizer = ReplicaSynchronizer::new(options);
    for _ in 0..3 {
        synchronizer
            .sync(&fixture.local(), &fixture.remote())
            .unwrap();
    }

    let local = StoreStateChecker::open(&fixture.local_path);
    let remote = StoreStateChecker::open(&fixture.remote_path);
    assert_eq!(local.history_versions(1), vec![1, 2, 3, 4]);
    assert_eq!(remote.history_versions(1), vec![1, 2, 3]);
}

#[test]
fn test_conflicting_edit_ends_with_pushed_value() {
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "Base", "Base").unwrap();
    full_sync(&fixture);

    fixture.local().update(1, "LocalEdit", "L").unwrap();
    fixture.remote().update(1, "RemoteEdit", "R").unwrap();
    full_sync(&fixture);

    let expected = Some(Entity::new(1, "LocalEdit", "L"));
    assert_eq!(fixture.local().get(1).unwrap(), expected);
    assert_eq!(fixture.remote().get(1).unwrap(), expected);

    // The overwritten remote edit is still recoverable from history.
    let remote_history = fixture.remote().history(1).unwrap();
    assert!(
        remote_history
            .iter()
            .any(|r| r.name == "RemoteEdit" && r.address == "R")
    );
}

#[test]
fn test_pull_only_adopts_remote_edit() {
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "Base", "Base").unwrap();
    full_sync(&fixture);

    fixture.local().update(1, "LocalEdit", "L").unwrap();
    fixture.remote().update(1, "RemoteEdit", "R").unwrap();
    let options = SyncOptions {
        pull_only: true,
        ..Default::default()
    };
    ReplicaSynchronizer::new(options)
        .sync(&fixture.local(), &fixture.remote())
        .unwrap();

    assert_eq!(
        fixture.local().get(1).unwrap(),
        Some(Entity::new(1, "RemoteEdit", "R"))
    );
}
