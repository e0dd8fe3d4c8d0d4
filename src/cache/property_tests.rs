//! Property-Based Tests for the stat cache
//!
//! Drives `LruStatCache` with random operation sequences and checks it
//! against a plain map model.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::bucket::Object;
use crate::cache::{LruStatCache, StatCache};

// == Test Configuration ==
const LARGE_CAPACITY: usize = 1_000;

// == Strategies ==
/// Small name space so operations collide often
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-e]".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Insert {
        name: String,
        generation: i64,
        metageneration: i64,
        ttl_secs: i64,
    },
    LookUp {
        name: String,
    },
    Erase {
        name: String,
    },
    Advance {
        secs: i64,
    },
    Purge,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (name_strategy(), 1i64..5, 1i64..3, 1i64..30).prop_map(
            |(name, generation, metageneration, ttl_secs)| CacheOp::Insert {
                name,
                generation,
                metageneration,
                ttl_secs,
            }
        ),
        name_strategy().prop_map(|name| CacheOp::LookUp { name }),
        name_strategy().prop_map(|name| CacheOp::Erase { name }),
        (0i64..20).prop_map(|secs| CacheOp::Advance { secs }),
        Just(CacheOp::Purge),
    ]
}

fn object(name: &str, generation: i64, metageneration: i64) -> Arc<Object> {
    Arc::new(Object {
        name: name.to_string(),
        generation,
        metageneration,
        size: 0,
        content_type: None,
        content_encoding: None,
        cache_control: None,
        metadata: BTreeMap::new(),
        md5: String::new(),
        updated: DateTime::<Utc>::UNIX_EPOCH,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Without evictions the cache must answer exactly like a map of
    // (record, expiration) that ignores entries at or past expiration and
    // refuses to replace newer records.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = LruStatCache::new(LARGE_CAPACITY);
        let mut model: HashMap<String, (Arc<Object>, DateTime<Utc>)> = HashMap::new();
        let mut now = DateTime::<Utc>::UNIX_EPOCH;

        for op in ops {
            match op {
                CacheOp::Insert { name, generation, metageneration, ttl_secs } => {
                    let o = object(&name, generation, metageneration);
                    let expiration = now + Duration::seconds(ttl_secs);
                    cache.insert(o.clone(), expiration);

                    let keep_existing = model
                        .get(&name)
                        .map(|(existing, _)| existing.is_newer_than(&o))
                        .unwrap_or(false);
                    if !keep_existing {
                        model.insert(name, (o, expiration));
                    }
                }
                CacheOp::LookUp { name } => {
                    let expected = model
                        .get(&name)
                        .filter(|(_, expiration)| now < *expiration)
                        .map(|(o, _)| o.clone());
                    if expected.is_none() {
                        model.remove(&name);
                    }
                    prop_assert_eq!(cache.look_up(&name, now), expected);
                }
                CacheOp::Erase { name } => {
                    cache.erase(&name);
                    model.remove(&name);
                }
                CacheOp::Advance { secs } => {
                    now += Duration::seconds(secs);
                }
                CacheOp::Purge => {
                    let before = model.len();
                    model.retain(|_, (_, expiration)| now < *expiration);
                    prop_assert_eq!(cache.purge_expired(now, usize::MAX), before - model.len());
                }
            }

            cache.check_invariants();
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    // The number of entries never exceeds capacity, whatever is inserted.
    #[test]
    fn prop_capacity_enforcement(
        names in prop::collection::vec("[a-z]{1,3}", 1..200),
        capacity in 1usize..20
    ) {
        let mut cache = LruStatCache::new(capacity);
        let expiration = DateTime::<Utc>::UNIX_EPOCH + Duration::hours(1);

        for name in names {
            cache.insert(object(&name, 1, 1), expiration);
            prop_assert!(
                cache.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                cache.len(),
                capacity
            );
            cache.check_invariants();
        }
    }

    // Erasing any name, present or not, any number of times never fails and
    // leaves the name absent.
    #[test]
    fn prop_erase_idempotent(
        present in prop::collection::vec(name_strategy(), 0..5),
        target in name_strategy(),
        repeats in 1usize..4
    ) {
        let mut cache = LruStatCache::new(LARGE_CAPACITY);
        let now = DateTime::<Utc>::UNIX_EPOCH;
        for name in &present {
            cache.insert(object(name, 1, 1), now + Duration::seconds(60));
        }

        for _ in 0..repeats {
            cache.erase(&target);
        }

        prop_assert!(cache.look_up(&target, now).is_none());
        cache.check_invariants();
    }
}
