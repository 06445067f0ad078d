use versync::storage::RetentionPolicy;
use versync::sync::{PruneTarget, ReplicaSynchronizer, SyncOptions};
use versync::test_utils::ReplicaFixture;

use super::state::StoreStateChecker;

#[test]
fn test_remote_trimmed_after_each_sync() {
    let fixture = ReplicaFixture::new();
    fixture.local().create(1, "John", "A").unwrap();

    let options = SyncOptions {
        prune_target: PruneTarget::Remote,
        retention: RetentionPolicy::new(2).unwrap(),
        ..Default::default()
    };
    let synchronizer = ReplicaSynchronizer::new(options);
    for _ in 0..5 {
        let report = synchronizer
            .sync(&fixture.local(), &fixture.remote())
            .unwrap();
        assert_eq!(report.pruned.len(), 1);
        assert_eq!(report.pruned[0].store, "remote");
    }

    let remote = StoreStateChecker::open(&fixture.remote_path);
    assert_eq!(remote.history_versions(1), vec![4, 5]);
    let local = StoreStateChecker::open(&fixture.local_path);
    assert_eq!(local.history_versions(1).len(), 6);
}

#[test]
fn test_default_keep_five_on_file_store() {
    let fixture = ReplicaFixture::new();
    let store = fixture.local();
    store.create(1, "v", "1").unwrap();
    for n in 2..=7 {
        store.update(1, "v", &n.to_string()).unwrap();
    }

    let report = RetentionPolicy::default().prune(&store).unwrap();
    assert_eq!(report.rows_deleted, 2);
    drop(store);

    let checker = StoreStateChecker::open(&fixture.local_path);
    assert_eq!(checker.history_versions(1), vec![3, 4, 5, 6, 7]);
}

#[test]
fn test_rollback_to_pruned_version_fails() {
    let fixture = ReplicaFixture::new();
    let store = fixture.local();
    store.create(1, "v", "1").unwrap();
    for n in 2..=4 {
        store.update(1, "v", &n.to_string()).unwrap();
    }
    RetentionPolicy::new(2).unwrap().prune(&store).unwrap();

    let err = store.rollback(1, 1).unwrap_err();
    assert!(matches!(
        err,
        versync::VsError::VersionNotFound { id: 1, version: 1 }
    ));
    assert!(store.rollback(1, 3).is_ok());
}
