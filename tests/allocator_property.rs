#[macro_use]
extern crate proptest;

use proptest::prelude::prop;
use rustc_hash::{FxHashMap, FxHashSet};

use pipeweave::graph::IdentifierAllocator;
use pipeweave::types::type_prefix;

fn type_strategy() -> impl proptest::prelude::Strategy<Value = &'static str> {
    prop::sample::select(vec!["text", "text_input", "llm", "gemini", "output", "merge"])
}

proptest! {
    /// For any sequence of allocations, ids are pairwise distinct.
    #[test]
    fn prop_ids_pairwise_distinct(types in prop::collection::vec(type_strategy(), 1..64)) {
        let mut allocator = IdentifierAllocator::new();
        let ids: Vec<String> = types.iter().map(|t| allocator.allocate(t)).collect();

        let unique: FxHashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    /// Per type, sequence numbers are strictly increasing in allocation order.
    #[test]
    fn prop_sequence_strictly_increasing_per_type(
        types in prop::collection::vec(type_strategy(), 1..64),
    ) {
        let mut allocator = IdentifierAllocator::new();
        let mut last_seen: FxHashMap<&str, u64> = FxHashMap::default();

        for type_name in &types {
            let id = allocator.allocate(type_name);
            prop_assert_eq!(type_prefix(&id), *type_name);

            let (_, suffix) = id.rsplit_once('-').expect("allocated ids carry a counter");
            let n: u64 = suffix.parse().expect("counter suffix is numeric");
            if let Some(prev) = last_seen.get(*type_name) {
                prop_assert!(n > *prev);
            }
            last_seen.insert(*type_name, n);
        }
    }

    /// Restoring from a persisted counter table never replays an id.
    #[test]
    fn prop_restore_continues_past_used_ids(
        before in prop::collection::vec(type_strategy(), 1..32),
        after in prop::collection::vec(type_strategy(), 1..32),
    ) {
        let mut allocator = IdentifierAllocator::new();
        let mut issued: FxHashSet<String> = FxHashSet::default();
        for type_name in &before {
            issued.insert(allocator.allocate(type_name));
        }

        let mut restored = IdentifierAllocator::from_counters(allocator.counters().clone());
        for type_name in &after {
            let id = restored.allocate(type_name);
            prop_assert!(!issued.contains(&id));
            issued.insert(id);
        }
    }
}
