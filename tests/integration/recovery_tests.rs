use versync::VsError;
use versync::storage::{Database, VersionedStore};
use versync::sync::ReplicaSynchronizer;
use versync::test_utils::ReplicaFixture;

use super::state::StoreStateChecker;

#[test]
fn test_failed_push_leaves_remote_file_untouched() {
    let fixture = ReplicaFixture::new();
    let local = fixture.local();
    local.create(1, "a", "a").unwrap();
    local.create(2, "b", "b").unwrap();
    let remote = fixture.remote();
    remote
        .db()
        .conn()
        .execute_batch(
            "CREATE TRIGGER reject_two BEFORE INSERT ON MainData
             WHEN NEW.id = 2 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let err = ReplicaSynchronizer::default()
        .sync(&local, &remote)
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, VsError::TransferFailure { id: Some(2), .. }));
    drop(remote);

    assert_eq!(StoreStateChecker::open(&fixture.remote_path).entity_count(), 0);
}

#[test]
fn test_rerun_after_failed_pull_converges() {
    let fixture = ReplicaFixture::new();
    let local = fixture.local();
    local.create(1, "a", "a").unwrap();
    fixture.remote().create(2, "b", "b").unwrap();
    local
        .db()
        .conn()
        .execute_batch(
            "CREATE TRIGGER reject_two BEFORE INSERT ON MainData
             WHEN NEW.id = 2 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let remote = fixture.remote();
    assert!(ReplicaSynchronizer::default().sync(&local, &remote).is_err());
    assert_eq!(remote.entity_count().unwrap(), 2);

    local
        .db()
        .conn()
        .execute_batch("DROP TRIGGER reject_two;")
        .unwrap();
    ReplicaSynchronizer::default().sync(&local, &remote).unwrap();
    assert_eq!(local.entities().unwrap(), remote.entities().unwrap());
}

#[test]
fn test_open_directory_is_connection_failure() {
    let fixture = ReplicaFixture::new();
    let err = Database::open(fixture.temp_dir.path()).unwrap_err();
    assert!(matches!(err, VsError::ConnectionFailure { .. }));
}

#[test]
fn test_two_handles_on_one_file_see_each_other() {
    let fixture = ReplicaFixture::new();
    let writer = fixture.local();
    let reader = VersionedStore::open(&fixture.local_path).unwrap();

    writer.create(1, "a", "a").unwrap();
    assert_eq!(reader.get(1).unwrap().map(|e| e.name), Some("a".to_string()));
}
