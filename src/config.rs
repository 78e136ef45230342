//! Tunable constants for the traversal engine, grouped into named presets
//! the way [`Config`] in this codebase's storage layer groups [`crate::config::Config::default`],
//! `balanced()` and friends.

use std::time::Duration;

/// Runtime-tunable limits governing one [`crate::engine::get_lineage`] call.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Maximum number of frontier urns grouped into a single search batch.
    pub batch_size: usize,
    /// Page size requested from the search backend per batch query.
    pub max_elastic_result: usize,
    /// Wall-clock budget for an entire traversal, measured from the first hop.
    pub timeout: Duration,
    /// Value of `properties.source` that marks an edge as manually authored
    /// and therefore exempt from time-range filtering.
    pub manual_sentinel: &'static str,
}

impl Default for Config {
    /// Production defaults fixed by the external contract: `BATCH_SIZE = 1000`,
    /// `MAX_ELASTIC_RESULT = 10_000`, `TIMEOUT_SECS = 10`, `MANUAL_SENTINEL = "UI"`.
    fn default() -> Self {
        Config {
            batch_size: 1000,
            max_elastic_result: 10_000,
            timeout: Duration::from_secs(10),
            manual_sentinel: "UI",
        }
    }
}

impl Config {
    /// Small batches and a short timeout, so unit tests can exercise
    /// multi-batch partitioning and deadline truncation without needing
    /// thousands of fixture urns or multi-second sleeps.
    pub fn testing() -> Self {
        Config {
            batch_size: 2,
            max_elastic_result: 50,
            timeout: Duration::from_millis(500),
            ..Config::default()
        }
    }

    /// A deadline so tight that any non-trivial batch is expected to miss
    /// it; used by the deadline-honored property test.
    pub fn strict() -> Self {
        Config {
            timeout: Duration::from_millis(1),
            ..Config::testing()
        }
    }
}
