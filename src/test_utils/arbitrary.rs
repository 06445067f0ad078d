use proptest::prelude::*;

use crate::storage::{Entity, VersionedStore};

/// One mutating call against a store.
#[derive(Debug, Clone)]
pub enum StoreOp {
    Create(Entity),
    Update(Entity),
    Upsert(Entity),
    Rollback { id: i64, version: i64 },
}

impl StoreOp {
    /// Apply to `store`, ignoring domain errors such as duplicate creates.
    pub fn apply(&self, store: &VersionedStore) {
        let _ = match self {
            Self::Create(e) => store.create(e.id, &e.name, &e.address).map(|_| ()),
            Self::Update(e) => store.update(e.id, &e.name, &e.address).map(|_| ()),
            Self::Upsert(e) => store.upsert(e.id, &e.name, &e.address).map(|_| ()),
            Self::Rollback { id, version } => store.rollback(*id, *version).map(|_| ()),
        };
    }
}

pub fn arb_entity() -> impl Strategy<Value = Entity> {
    (0i64..6, "[A-Za-z]{1,8}", "[0-9]{1,3} [A-Za-z]{2,10}")
        .prop_map(|(id, name, address)| Entity { id, name, address })
}

pub fn arb_store_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => arb_entity().prop_map(StoreOp::Create),
        3 => arb_entity().prop_map(StoreOp::Update),
        3 => arb_entity().prop_map(StoreOp::Upsert),
        1 => (0i64..6, 1i64..5).prop_map(|(id, version)| StoreOp::Rollback { id, version }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RetentionPolicy;

    proptest! {
        #[test]
        fn versions_are_contiguous_from_one(ops in prop::collection::vec(arb_store_op(), 0..40)) {
            let store = VersionedStore::open_in_memory().unwrap();
            for op in &ops {
                op.apply(&store);
            }
            for entity in store.entities().unwrap() {
                let versions: Vec<i64> =
                    store.history(entity.id).unwrap().iter().map(|r| r.version).collect();
                let expected: Vec<i64> = (1..=versions.len() as i64).collect();
                prop_assert_eq!(versions, expected);
            }
        }

        #[test]
        fn every_entity_has_history(ops in prop::collection::vec(arb_store_op(), 0..40)) {
            let store = VersionedStore::open_in_memory().unwrap();
            for op in &ops {
                op.apply(&store);
            }
            for entity in store.entities().unwrap() {
                prop_assert!(store.max_version(entity.id).unwrap().is_some());
            }
        }

        #[test]
        fn prune_leaves_at_most_keep(
            ops in prop::collection::vec(arb_store_op(), 0..40),
            keep in 1usize..4,
        ) {
            let store = VersionedStore::open_in_memory().unwrap();
            for op in &ops {
                op.apply(&store);
            }
            let before: Vec<_> = store
                .entities()
                .unwrap()
                .iter()
                .map(|e| (e.id, store.max_version(e.id).unwrap()))
                .collect();

            RetentionPolicy::new(keep).unwrap().prune(&store).unwrap();

            for (id, max) in before {
                let history = store.history(id).unwrap();
                prop_assert!(history.len() <= keep);
                prop_assert_eq!(history.last().map(|r| r.version), max);
            }
        }
    }
}
