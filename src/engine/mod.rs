//! The lineage graph traversal engine: breadth-first expansion over a
//! search index of edge documents, with per-level concurrent batching and
//! a global wall-clock deadline.
//!
//! [`Engine`] bundles the injected collaborators ([`crate::registry::Registry`],
//! [`crate::search::SearchClient`], [`crate::search::IndexNaming`]) plus this
//! crate's ambient [`crate::config::Config`] and [`crate::metrics::EngineMetrics`].
//! Everything else — the hop loop, path tracking, batching, hit validation —
//! is request-scoped state built fresh inside [`Engine::get_lineage`].

mod batch;
mod bfs;
mod extractor;

pub use extractor::Candidate;

use crate::config::Config;
use crate::metrics::EngineMetrics;
use crate::model::{GraphFilters, LineageDirection, LineageResponse, Urn};
use crate::registry::Registry;
use crate::search::{IndexNaming, SearchClient};
use std::sync::Arc;

/// One urn in a hop's frontier, paired with the entity type it was
/// discovered as. Entity type must travel with the urn (rather than being
/// re-derived) because the batch executor groups frontier urns by type to
/// consult the registry and build per-type sub-queries.
#[derive(Clone, Debug)]
pub(crate) struct FrontierEntry {
    pub urn: Urn,
    pub entity_type: String,
}

/// The traversal engine, parameterized only by its injected collaborators.
///
/// Cloning an `Engine` is cheap (every field is an `Arc` or `Copy`), so a
/// single instance can be shared across concurrently-issued `get_lineage`
/// calls — each call is independent and shares no mutable state with any
/// other.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<dyn Registry>,
    search: Arc<dyn SearchClient>,
    index_naming: Arc<dyn IndexNaming>,
    metrics: Arc<EngineMetrics>,
    config: Config,
}

impl Engine {
    /// Builds an engine from its three required collaborators, using
    /// [`Config::default`] and a fresh [`EngineMetrics`].
    pub fn new(registry: Arc<dyn Registry>, search: Arc<dyn SearchClient>, index_naming: Arc<dyn IndexNaming>) -> Self {
        Engine { registry, search, index_naming, metrics: Arc::new(EngineMetrics::new()), config: Config::default() }
    }

    /// Overrides the default config, builder-style.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The metrics this engine accumulates into. Shared across every
    /// `get_lineage` call issued from this instance.
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Runs one lineage traversal from `root` up to `max_hops` levels deep
    /// in `direction`, narrowed by `filters` and the optional
    /// `[start_ms, end_ms]` time window, returning the `[offset, offset +
    /// count)` slice of discovered relationships alongside the pre-slice
    /// total.
    ///
    /// Silent partial results are possible: if the 10-second (by default)
    /// wall-clock deadline elapses mid-traversal, this returns whatever was
    /// discovered up to that point rather than erroring — see
    /// [`crate::error::EngineError`]'s docs for the full error-handling
    /// policy.
    pub async fn get_lineage(
        &self,
        root: Urn,
        direction: LineageDirection,
        filters: GraphFilters,
        offset: usize,
        count: usize,
        max_hops: u32,
        start_ms: Option<i64>,
        end_ms: Option<i64>,
    ) -> crate::error::Result<LineageResponse> {
        bfs::run(self, root, direction, filters, offset, count, max_hops, start_ms, end_ms).await
    }

    pub(crate) fn registry(&self) -> &dyn Registry {
        self.registry.as_ref()
    }

    pub(crate) fn search(&self) -> Arc<dyn SearchClient> {
        Arc::clone(&self.search)
    }

    pub(crate) fn index_naming(&self) -> &dyn IndexNaming {
        self.index_naming.as_ref()
    }

    pub(crate) fn metrics_handle(&self) -> Arc<EngineMetrics> {
        Arc::clone(&self.metrics)
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }
}
