use crate::cache::RandomState;
use crate::cache::stats::Counters;
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use tracing::{debug, trace};

/// One independently locked part of the store.
///
/// Entries are only ever added, and only while the write lock is held. Readers of present keys
/// share the read lock and never wait for each other.
#[derive(Debug)]
pub(crate) struct Shard<K, V, S = RandomState> {
    id: usize,
    map: RwLock<HashMap<K, V, S>>,
    counters: Counters,
}

impl<K, V, S> Shard<K, V, S>
where
    S: BuildHasher,
{
    pub(crate) fn with_capacity_and_hasher(id: usize, capacity: usize, hash_builder: S) -> Self {
        Self {
            id,
            map: RwLock::new(HashMap::with_capacity_and_hasher(capacity, hash_builder)),
            counters: Counters::default(),
        }
    }
}

impl<K, V, S> Shard<K, V, S> {
    pub(crate) fn len(&self) -> usize {
        self.map.read().len()
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.counters
    }
}

impl<K, V, S> Shard<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let value = self.map.read().get(key).cloned();

        if value.is_some() {
            self.counters.increment_hit_count();
            trace!(shard = self.id, "hit on read lock");
        } else {
            self.counters.increment_miss_count();
            trace!(shard = self.id, "miss on read lock");
        }

        value
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.read().contains_key(key)
    }

    /// Returns the stored value for `key`, or runs `compute` and stores its result.
    ///
    /// `compute` runs while the write lock is held, so of all callers racing on an absent key only
    /// the first to take the lock runs it. An `Err` (or a panic) leaves the key absent.
    pub(crate) fn try_get_or_set<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        {
            let map = self.map.read();
            if let Some(value) = map.get(&key) {
                self.counters.increment_hit_count();
                trace!(shard = self.id, "hit on read lock");
                return Ok(value.clone());
            }
        }

        trace!(shard = self.id, "miss on read lock");
        let mut map = self.map.write();

        // the key may have been stored between dropping the read lock and taking the write lock
        if let Some(value) = map.get(&key) {
            self.counters.increment_hit_count();
            debug!(shard = self.id, "value stored by a concurrent caller");
            return Ok(value.clone());
        }

        self.counters.increment_miss_count();

        match compute() {
            Ok(value) => {
                map.insert(key, value.clone());
                self.counters.increment_compute_count();
                debug!(shard = self.id, "computed and stored value");
                Ok(value)
            }
            Err(err) => {
                self.counters.increment_compute_failure_count();
                debug!(shard = self.id, "computation failed, key left absent");
                Err(err)
            }
        }
    }
}
