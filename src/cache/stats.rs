use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected since the previous call to [`Cache::stats`](crate::Cache::stats).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Stats {
    pub miss_count: u64,
    pub hit_count: u64,
    /// Values computed and stored.
    pub compute_count: u64,
    /// Fallible computations that returned an error and stored nothing.
    pub compute_failure_count: u64,
    pub millis_elapsed: u128,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    compute_count: AtomicU64,
    compute_failure_count: AtomicU64,
}

impl Counters {
    pub(crate) fn increment_hit_count(&self) {
        self.hit_count.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn increment_miss_count(&self) {
        self.miss_count.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn increment_compute_count(&self) {
        self.compute_count.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn increment_compute_failure_count(&self) {
        self.compute_failure_count.fetch_add(1, Ordering::AcqRel);
    }

    /// Adds the current values to `stats` and resets them to zero.
    pub(crate) fn drain_into(&self, stats: &mut Stats) {
        stats.hit_count += self.hit_count.swap(0, Ordering::AcqRel);
        stats.miss_count += self.miss_count.swap(0, Ordering::AcqRel);
        stats.compute_count += self.compute_count.swap(0, Ordering::AcqRel);
        stats.compute_failure_count += self.compute_failure_count.swap(0, Ordering::AcqRel);
    }
}
