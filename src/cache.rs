use crate::Stats;
use crate::config::Config;
use parking_lot::Mutex;
use shard::Shard;
use std::borrow::Borrow;
use std::convert::Infallible;
use std::hash::{BuildHasher, Hash};
use std::time::Instant;
use tracing::debug;

mod shard;
pub(crate) mod stats;

pub(crate) type RandomState = ahash::RandomState;

/// Thread-safe in-memory cache that computes the value of each key exactly once.
///
/// The store is split into shards, each a map behind its own [`parking_lot::RwLock`]. Lookups of
/// present keys only take a read lock and run in parallel. Populating an absent key takes the
/// write lock of the key's shard, checks the key again and only then runs the computation, so
/// concurrent callers racing on the same key never compute it twice.
///
/// Entries are never updated, evicted or removed. Wrap the cache in a [`std::sync::Arc`] to share
/// it between threads. All operations only require shared references to the cache.
#[derive(Debug)]
pub struct Cache<K = String, V = String, S = RandomState> {
    hash_builder: S,
    shards: Box<[Shard<K, V, S>]>,
    metrics_last_accessed: Mutex<Instant>,
}

impl<K, V> Cache<K, V, RandomState> {
    /// Creates an empty cache with the default [`Config`].
    pub fn new() -> Cache<K, V, RandomState> {
        Cache::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Cache<K, V, RandomState> {
        Cache::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V> Default for Cache<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Cache<K, V, S>
where
    S: Clone + BuildHasher,
{
    /// Creates an empty cache with the default [`Config`], using `hash_builder` to hash the keys.
    pub fn with_hasher(hash_builder: S) -> Cache<K, V, S> {
        Cache::with_config_and_hasher(&Config::default(), hash_builder)
    }

    /// Creates an empty cache, using `hash_builder` to hash the keys.
    ///
    /// The initial capacity is spread evenly over the shards and rounded up.
    pub fn with_config_and_hasher(config: &Config, hash_builder: S) -> Cache<K, V, S> {
        let number_of_shards = config.shards.get();
        let capacity_per_shard = config.initial_capacity.div_ceil(number_of_shards);

        let shards = (0..number_of_shards)
            .map(|id| Shard::with_capacity_and_hasher(id, capacity_per_shard, hash_builder.clone()))
            .collect();

        debug!(
            shards = number_of_shards,
            capacity_per_shard, "created cache"
        );

        Self {
            hash_builder,
            shards,
            metrics_last_accessed: Mutex::new(Instant::now()),
        }
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    /// Returns the value corresponding to the key, or [`None`] if the key has not been stored
    /// yet.
    ///
    /// Only takes the read lock of the key's shard. The value is cloned; wrap values in
    /// [`std::sync::Arc`] if cloning is too expensive for your use case.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_shard(key).get(key)
    }

    /// Returns the value stored for `key`, computing and storing it with `compute` if absent.
    ///
    /// For a given key `compute` runs at most once over the lifetime of the cache, no matter how
    /// many threads call this method concurrently. Callers that lose the race wait for the
    /// winner and return the stored value. Callers for keys that are already present never
    /// wait on each other.
    ///
    /// `compute` runs while the write lock of the key's shard is held, which blocks callers of
    /// other absent keys in the same shard. It must not call back into this cache.
    ///
    /// If `compute` panics, the panic is propagated, nothing is stored and a later call for the
    /// same key computes the value again.
    ///
    /// ```rust
    /// use once_cache::Cache;
    ///
    /// let cache: Cache = Cache::new();
    ///
    /// let value = cache.get_or_set(String::from("key"), || String::from("value"));
    /// assert_eq!(value, "value");
    ///
    /// let value = cache.get_or_set(String::from("key"), || unreachable!());
    /// assert_eq!(value, "value");
    /// ```
    pub fn get_or_set<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let Ok(value) = self.try_get_or_set(key, || Ok::<V, Infallible>(compute()));
        value
    }

    /// Like [`Cache::get_or_set`], for computations that can fail.
    ///
    /// An error is returned to this caller only. Nothing is stored, so the key stays absent and
    /// the next caller runs its own computation.
    ///
    /// ```rust
    /// use once_cache::Cache;
    ///
    /// let cache: Cache<&str, u32> = Cache::new();
    ///
    /// assert_eq!(cache.try_get_or_set("answer", || "forty-two".parse::<u32>()).ok(), None);
    /// assert_eq!(cache.get("answer"), None);
    ///
    /// assert_eq!(cache.try_get_or_set("answer", || "42".parse::<u32>()), Ok(42));
    /// ```
    pub fn try_get_or_set<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.get_shard(&key).try_get_or_set(key, compute)
    }

    /// Returns `true` if a value has been stored for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_shard(key).contains_key(key)
    }

    fn get_shard<Q>(&self, key: &Q) -> &Shard<K, V, S>
    where
        Q: ?Sized + Hash,
    {
        // the maps inside the shards consume the low bits of the same hash
        let hash = self.hash_builder.hash_one(key) >> 32;
        &self.shards[hash as usize % self.shards.len()]
    }
}

impl<K, V, S> Cache<K, V, S> {
    /// Returns the number of stored entries.
    ///
    /// Shards are counted one after the other, so the result may be stale while other threads
    /// are populating keys.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.len() == 0)
    }

    /// Returns the statistics gathered since the previous call and resets them.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::default();

        let millis_elapsed = {
            let mut guard = self.metrics_last_accessed.lock();
            let millis_elapsed = guard.elapsed().as_millis();
            *guard = Instant::now();
            millis_elapsed
        };

        stats.millis_elapsed = millis_elapsed;

        for shard in self.shards.iter() {
            shard.counters().drain_into(&mut stats);
        }

        stats
    }
}
