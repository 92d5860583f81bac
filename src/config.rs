//! Cache configuration.
//!
//! A [`Cache`](crate::Cache) works without any configuration. [`Config`] only exists to tune how the
//! store is split into shards and how much room each shard reserves up front.

use crate::error::{Error, Result};
use std::env;
use std::num::NonZero;
use std::str::FromStr;
use std::thread;

/// Environment variable holding the number of shards.
pub const SHARDS_ENV: &str = "ONCE_CACHE_SHARDS";

/// Environment variable holding the number of entries to pre-allocate.
pub const INITIAL_CAPACITY_ENV: &str = "ONCE_CACHE_INITIAL_CAPACITY";

const FALLBACK_PARALLELISM: usize = 1;
const SHARDS_PER_THREAD: usize = 4;

/// Tuning parameters of a [`Cache`](crate::Cache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of independently locked shards. A single shard turns the cache into one map behind
    /// one lock.
    pub shards: NonZero<usize>,
    /// Number of entries reserved across all shards. This is not a limit; the cache never evicts.
    pub initial_capacity: usize,
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// # Environment Variables
    /// - `ONCE_CACHE_SHARDS` - number of shards (default: four per available thread)
    /// - `ONCE_CACHE_INITIAL_CAPACITY` - entries to pre-allocate (default: 0)
    ///
    /// Unset variables fall back to the defaults. Variables that are set but cannot be parsed are
    /// reported as [`Error::InvalidEnvVar`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(shards) = parse_var::<usize, _>(&lookup, SHARDS_ENV)? {
            config.shards = NonZero::new(shards).ok_or(Error::ZeroShards)?;
        }

        if let Some(initial_capacity) = parse_var::<usize, _>(&lookup, INITIAL_CAPACITY_ENV)? {
            config.initial_capacity = initial_capacity;
        }

        Ok(config)
    }

    pub fn with_shards(mut self, shards: NonZero<usize>) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Same as [`Config::with_shards`] for callers holding a plain `usize`.
    pub fn try_with_shards(self, shards: usize) -> Result<Self> {
        let shards = NonZero::new(shards).ok_or(Error::ZeroShards)?;
        Ok(self.with_shards(shards))
    }
}

impl Default for Config {
    fn default() -> Self {
        let available_parallelism = thread::available_parallelism()
            .map(NonZero::get)
            .unwrap_or(FALLBACK_PARALLELISM);

        let shards = NonZero::new(available_parallelism.saturating_mul(SHARDS_PER_THREAD))
            .unwrap_or(NonZero::<usize>::MIN);

        Self {
            shards,
            initial_capacity: 0,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnvVar { name, value }),
    }
}
