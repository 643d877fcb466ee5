//! Property-based tests for the concurrent map using proptest
//!
//! A `std` `HashMap` driven by the same operations serves as the model.

use super::ConcurrentMap;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
enum MapOp {
    Set(u8, i32),
    Delete(u8),
}

fn map_op() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        3 => (any::<u8>(), any::<i32>()).prop_map(|(k, v)| MapOp::Set(k, v)),
        1 => any::<u8>().prop_map(MapOp::Delete),
    ]
}

proptest! {
    #[test]
    fn test_matches_model(ops in prop::collection::vec(map_op(), 0..200)) {
        let map: ConcurrentMap<u8, i32> = ConcurrentMap::new();
        let mut model = HashMap::new();

        for op in &ops {
            match *op {
                MapOp::Set(k, v) => {
                    map.set(k, v);
                    model.insert(k, v);
                }
                MapOp::Delete(k) => {
                    map.delete(&k);
                    model.remove(&k);
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        // Get returns the last value set, and nothing for deleted or unset keys
        for k in 0..=u8::MAX {
            prop_assert_eq!(map.get(&k), model.get(&k).copied());
            prop_assert_eq!(map.contains_key(&k), model.contains_key(&k));
        }
    }

    #[test]
    fn test_delete_absent_keeps_len(
        keys in prop::collection::hash_set(0u16..1000, 0..50),
        absent in 1000u16..2000
    ) {
        let map: ConcurrentMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let before = map.len();

        map.delete(&absent);

        prop_assert_eq!(map.len(), before);
        prop_assert_eq!(before, keys.len());
    }

    #[test]
    fn test_for_each_aggregate(entries in prop::collection::hash_map(any::<u32>(), 0u64..1_000_000, 0..100)) {
        let map: ConcurrentMap<u32, u64> = ConcurrentMap::new();
        for (&k, &v) in &entries {
            map.set(k, v);
        }

        let mut visits = 0;
        let mut sum = 0u64;
        map.for_each(|_, v| {
            visits += 1;
            sum += *v;
        });

        prop_assert_eq!(visits, entries.len());
        prop_assert_eq!(sum, entries.values().sum::<u64>());
    }

    #[test]
    fn test_concurrent_distinct_keys(
        num_threads in 1usize..6,
        items_per_thread in 1usize..200
    ) {
        let map = Arc::new(ConcurrentMap::new());

        let handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for i in 0..items_per_thread {
                        map.set(thread_id * items_per_thread + i, thread_id);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        prop_assert_eq!(map.len(), num_threads * items_per_thread);
    }
}
