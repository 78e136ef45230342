//! Minimal metrics surface for the traversal engine.
//!
//! Mirrors the plain-struct-with-a-snapshot shape of `PerformanceMetrics`
//! in this codebase's storage layer, but uses atomics: unlike that struct,
//! which is only ever touched from a single thread holding `&mut`, this one
//! is updated concurrently from every batch a hop spawns onto the blocking
//! thread pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters and timers exposed for one [`crate::engine::get_lineage`] call.
///
/// Exactly the two signals named by the external contract: a read counter
/// and a query-duration timer. No other metrics are part of this engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    num_elastic_search_reads: AtomicU64,
    es_query_total_nanos: AtomicU64,
}

impl EngineMetrics {
    /// Creates a fresh, zeroed metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one search call (including `search_after` calls) and its
    /// wall-clock duration.
    pub fn record_search(&self, duration: Duration) {
        self.num_elastic_search_reads.fetch_add(1, Ordering::Relaxed);
        self.es_query_total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Total number of search reads issued so far.
    pub fn num_elastic_search_reads(&self) -> u64 {
        self.num_elastic_search_reads.load(Ordering::Relaxed)
    }

    /// Cumulative time spent inside search calls.
    pub fn es_query_total(&self) -> Duration {
        Duration::from_nanos(self.es_query_total_nanos.load(Ordering::Relaxed))
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.num_elastic_search_reads.store(0, Ordering::Relaxed);
        self.es_query_total_nanos.store(0, Ordering::Relaxed);
    }

    /// Prints a short human-readable report to stdout.
    pub fn print_report(&self) {
        println!(
            "num_elasticSearch_reads={} esQuery_total={:?}",
            self.num_elastic_search_reads(),
            self.es_query_total()
        );
    }
}
