//! Property-based tests comparing the cache against a first-write-wins `HashMap` model.

use std::cell::Cell;
use std::collections::HashMap;

use once_cache::Cache;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum CacheOp {
    GetOrSet { key: String, value: String },
    TryGetOrSet { key: String, value: Option<String> },
    Get { key: String },
}

/// Draws keys from a small pool so that operations collide.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,16}"
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::GetOrSet { key, value }),
        (key_strategy(), prop::option::of(value_strategy()))
            .prop_map(|(key, value)| CacheOp::TryGetOrSet { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_matches_first_write_wins_model(ops in prop::collection::vec(cache_op_strategy(), 1..64)) {
        let cache: Cache = Cache::new();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::GetOrSet { key, value } => {
                    let calls = Cell::new(0);
                    let returned = cache.get_or_set(key.clone(), || {
                        calls.set(calls.get() + 1);
                        value.clone()
                    });

                    let present = model.contains_key(&key);
                    let expected = model.entry(key).or_insert(value).clone();
                    prop_assert_eq!(returned, expected);
                    prop_assert_eq!(calls.get(), if present { 0 } else { 1 });
                }
                CacheOp::TryGetOrSet { key, value } => {
                    let returned = cache.try_get_or_set(key.clone(), || value.clone().ok_or(()));

                    match (model.get(&key).cloned(), value) {
                        (Some(stored), _) => {
                            prop_assert_eq!(returned, Ok(stored));
                        }
                        (None, Some(value)) => {
                            prop_assert_eq!(returned, Ok(value.clone()));
                            model.insert(key, value);
                        }
                        (None, None) => {
                            // a failed computation stores nothing
                            prop_assert_eq!(returned, Err(()));
                            prop_assert!(!cache.contains_key(&key));
                        }
                    }
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key).cloned());
                }
            }
        }

        prop_assert_eq!(cache.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(cache.get(key), Some(value.clone()));
        }
    }

    #[test]
    fn prop_reads_are_idempotent(keys in prop::collection::hash_set(key_strategy(), 0..5), probe in key_strategy()) {
        let cache: Cache = Cache::new();
        for key in &keys {
            cache.get_or_set(key.clone(), || format!("value-{key}"));
        }

        let first = cache.get(&probe);
        for _ in 0..3 {
            prop_assert_eq!(cache.get(&probe), first.clone());
        }
        prop_assert_eq!(first.is_some(), keys.contains(&probe));
    }
}
