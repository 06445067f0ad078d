use proptest::prelude::*;

use versync::storage::{Entity, RetentionPolicy, VersionedStore};

fn arb_values() -> impl Strategy<Value = (String, String)> {
    ("[A-Za-z]{1,10}", "[0-9]{1,4} [A-Za-z ]{1,12}")
}

proptest! {
    #[test]
    fn update_archives_the_prior_state(
        initial in arb_values(),
        edits in prop::collection::vec(arb_values(), 1..12),
    ) {
        let store = VersionedStore::open_in_memory().unwrap();
        store.create(1, &initial.0, &initial.1).unwrap();

        let mut previous = Entity::new(1, initial.0.clone(), initial.1.clone());
        for (name, address) in &edits {
            let archived = store.update(1, name, address).unwrap();
            prop_assert!(archived.matches(&previous));
            previous = Entity::new(1, name.clone(), address.clone());
        }

        prop_assert_eq!(store.get(1).unwrap(), Some(previous));
        prop_assert_eq!(store.max_version(1).unwrap(), Some(edits.len() as i64 + 1));
    }

    #[test]
    fn versions_strictly_increase(edits in prop::collection::vec(arb_values(), 0..15)) {
        let store = VersionedStore::open_in_memory().unwrap();
        store.create(7, "n", "a").unwrap();
        for (name, address) in &edits {
            store.upsert(7, name, address).unwrap();
        }

        let versions: Vec<i64> = store.history(7).unwrap().iter().map(|r| r.version).collect();
        prop_assert!(versions.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(versions.first().copied(), Some(1));
    }

    #[test]
    fn rollback_restores_snapshot_without_new_history(
        edits in prop::collection::vec(arb_values(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = VersionedStore::open_in_memory().unwrap();
        store.create(1, "seed", "seed").unwrap();
        for (name, address) in &edits {
            store.update(1, name, address).unwrap();
        }

        let history = store.history(1).unwrap();
        let target = pick.get(&history[..]);
        let before = store.history_count().unwrap();
        let entity = store.rollback(1, target.version).unwrap();

        prop_assert!(target.matches(&entity));
        prop_assert_eq!(store.history_count().unwrap(), before);
    }

    #[test]
    fn prune_keeps_exactly_the_newest(
        counts in prop::collection::vec(1usize..10, 1..5),
        keep in 1usize..6,
    ) {
        let store = VersionedStore::open_in_memory().unwrap();
        for (id, total) in counts.iter().enumerate() {
            let id = id as i64;
            store.create(id, "v", "1").unwrap();
            for n in 2..=*total {
                store.update(id, "v", &n.to_string()).unwrap();
            }
        }

        let report = RetentionPolicy::new(keep).unwrap().prune(&store).unwrap();

        let mut expected_deleted = 0;
        for (id, total) in counts.iter().enumerate() {
            let versions: Vec<i64> =
                store.history(id as i64).unwrap().iter().map(|r| r.version).collect();
            let first_kept = total.saturating_sub(keep) + 1;
            let expected: Vec<i64> = (first_kept as i64..=*total as i64).collect();
            prop_assert_eq!(versions, expected);
            expected_deleted += total.saturating_sub(keep);
        }
        prop_assert_eq!(report.rows_deleted, expected_deleted);
    }
}
