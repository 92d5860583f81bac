//! A thread-safe, in-memory cache that computes the value of each key exactly once.
//!
//! The central operation is [`Cache::get_or_set`]. It returns the stored value for a key, or
//! computes, stores and returns it if the key is absent. However many threads race on the same
//! absent key, the computation runs only once and every caller gets the same value back.
//!
//! # Features
//!
//! - Reads of present keys only take a shared lock and never block each other
//! - Double-checked population: an absent key is looked up again under the exclusive lock before
//!   its value is computed
//! - Sharded store, so populating a key only blocks callers of keys in the same shard
//! - Failed or panicking computations leave the key absent, so the next caller retries
//! - No unsafe code
//!
//! Entries are never updated, evicted or expired.
//!
//! # Examples
//!
//! Memoizing a computation:
//!
//! ```rust
//! use once_cache::Cache;
//!
//! let cache: Cache = Cache::new();
//!
//! let value = cache.get_or_set(String::from("k3"), || format!("value{}", 3));
//! assert_eq!(value, "value3");
//! assert_eq!(cache.get("k3"), Some(String::from("value3")));
//! assert_eq!(cache.get("k4"), None);
//! ```
//!
//! Deduplicating concurrent computations:
//!
//! ```rust
//! use once_cache::Cache;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::thread;
//!
//! let cache: Cache<&str, usize> = Cache::new();
//! let computations = AtomicUsize::new(0);
//!
//! thread::scope(|s| {
//!     for _ in 0..8 {
//!         s.spawn(|| {
//!             cache.get_or_set("answer", || {
//!                 computations.fetch_add(1, Ordering::Relaxed);
//!                 42
//!             })
//!         });
//!     }
//! });
//!
//! assert_eq!(cache.get("answer"), Some(42));
//! assert_eq!(computations.load(Ordering::Relaxed), 1);
//! ```
//!
//! Tuning the number of shards:
//!
//! ```rust
//! use once_cache::{Cache, Config};
//!
//! // a single shard keeps every entry behind one lock
//! let config = Config::default().try_with_shards(1)?.with_initial_capacity(64);
//! let cache: Cache<u64, u64> = Cache::with_config(&config);
//!
//! assert_eq!(cache.get_or_set(7, || 49), 49);
//! # Ok::<(), once_cache::Error>(())
//! ```

#![forbid(unsafe_code)]
pub mod cache;
pub mod config;
pub mod error;

pub use cache::Cache;
pub use cache::stats::Stats;
pub use config::Config;
pub use error::Error;
