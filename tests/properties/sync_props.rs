use std::collections::BTreeMap;

use proptest::prelude::*;

use versync::storage::{Database, Entity, VersionedStore};
use versync::sync::{ReplicaSynchronizer, SyncOptions};

fn arb_rows() -> impl Strategy<Value = BTreeMap<i64, (String, String)>> {
    prop::collection::btree_map(0i64..20, ("[a-z]{1,6}", "[a-z]{1,6}"), 0..10)
}

fn seeded(label: &str, rows: &BTreeMap<i64, (String, String)>) -> VersionedStore {
    let store = VersionedStore::with_label(Database::open_in_memory().unwrap(), label);
    for (id, (name, address)) in rows {
        store.create(*id, name, address).unwrap();
    }
    store
}

proptest! {
    #[test]
    fn full_sync_converges_on_key_union(local_rows in arb_rows(), remote_rows in arb_rows()) {
        let local = seeded("local", &local_rows);
        let remote = seeded("remote", &remote_rows);

        ReplicaSynchronizer::default().sync(&local, &remote).unwrap();

        let local_entities = local.entities().unwrap();
        prop_assert_eq!(&local_entities, &remote.entities().unwrap());

        let ids: Vec<i64> = local_entities.iter().map(|e| e.id).collect();
        let mut union: Vec<i64> = local_rows.keys().chain(remote_rows.keys()).copied().collect();
        union.sort_unstable();
        union.dedup();
        prop_assert_eq!(ids, union);

        // Ids the local side had carry its values; the rest come from the remote.
        for entity in &local_entities {
            let source = local_rows.get(&entity.id).or_else(|| remote_rows.get(&entity.id));
            let (name, address) = source.unwrap();
            prop_assert_eq!(entity, &Entity::new(entity.id, name.clone(), address.clone()));
        }
    }

    #[test]
    fn pull_only_gives_remote_precedence(local_rows in arb_rows(), remote_rows in arb_rows()) {
        let local = seeded("local", &local_rows);
        let remote = seeded("remote", &remote_rows);
        let options = SyncOptions { pull_only: true, ..Default::default() };

        ReplicaSynchronizer::new(options).sync(&local, &remote).unwrap();

        for (id, (name, address)) in &remote_rows {
            prop_assert_eq!(
                local.get(*id).unwrap(),
                Some(Entity::new(*id, name.clone(), address.clone()))
            );
        }
        prop_assert_eq!(remote.entity_count().unwrap(), remote_rows.len() as u64);
    }

    #[test]
    fn history_grows_by_rows_transferred(local_rows in arb_rows(), remote_rows in arb_rows()) {
        let local = seeded("local", &local_rows);
        let remote = seeded("remote", &remote_rows);
        let local_before = local.history_count().unwrap();
        let remote_before = remote.history_count().unwrap();

        let report = ReplicaSynchronizer::default().sync(&local, &remote).unwrap();

        prop_assert_eq!(remote.history_count().unwrap(), remote_before + report.pushed);
        prop_assert_eq!(local.history_count().unwrap(), local_before + report.pulled);
    }
}
