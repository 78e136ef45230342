//! The edge-type registry interface consumed by the traversal engine.
//!
//! The registry's *contents* (which edges exist for which entity types) are
//! out of scope for this crate; only the lookup interface is consumed. This
//! module also provides an in-memory implementation used by tests, the CLI
//! fixture runner, and benches, standing in for whatever real registry a
//! caller wires in.

use crate::model::{EdgeDirection, EdgeInfo};
use rustc_hash::FxHashMap;

/// Source of structurally valid edge kinds for a given entity type.
///
/// Consulted once per `(entity_type, direction)` pair per hop by the
/// [`crate::engine::batch::BatchExecutor`]. Implementations are expected to
/// be synchronous and fast (an in-process lookup or a cached read), since
/// the engine dispatches them onto the async runtime's blocking pool rather
/// than `.await`-ing them directly — this codebase has no `async_trait`
/// dependency anywhere, so collaborator traits here stay plain `Sync` traits
/// rather than introducing one.
pub trait Registry: Send + Sync {
    /// Returns every edge kind that may originate from entities of
    /// `entity_type` in the given lineage direction.
    fn get_lineage_relationships(
        &self,
        entity_type: &str,
        direction: crate::model::LineageDirection,
    ) -> Vec<EdgeInfo>;
}

/// An in-memory [`Registry`] backed by a plain map, keyed by
/// `(lowercased entity type, direction)`.
#[derive(Debug, Default)]
pub struct SimpleRegistry {
    entries: FxHashMap<(String, DirectionKey), Vec<EdgeInfo>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum DirectionKey {
    Upstream,
    Downstream,
}

impl From<crate::model::LineageDirection> for DirectionKey {
    fn from(d: crate::model::LineageDirection) -> Self {
        match d {
            crate::model::LineageDirection::Upstream => DirectionKey::Upstream,
            crate::model::LineageDirection::Downstream => DirectionKey::Downstream,
        }
    }
}

impl SimpleRegistry {
    /// An empty registry; every lookup returns no edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `edges` as the valid outgoing edge set for
    /// `(entity_type, direction)`. Entity type is lower-cased at
    /// registration time so lookups can be case-insensitive without
    /// re-normalizing on every call.
    pub fn register(
        &mut self,
        entity_type: impl Into<String>,
        direction: crate::model::LineageDirection,
        edges: Vec<EdgeInfo>,
    ) -> &mut Self {
        self.entries
            .insert((entity_type.into().to_lowercase(), direction.into()), edges);
        self
    }

    /// Convenience builder-style constructor used by fixtures and tests.
    pub fn with(mut self, entity_type: impl Into<String>, direction: crate::model::LineageDirection, edges: Vec<EdgeInfo>) -> Self {
        self.register(entity_type, direction, edges);
        self
    }
}

impl Registry for SimpleRegistry {
    fn get_lineage_relationships(
        &self,
        entity_type: &str,
        direction: crate::model::LineageDirection,
    ) -> Vec<EdgeInfo> {
        self.entries
            .get(&(entity_type.to_lowercase(), direction.into()))
            .cloned()
            .unwrap_or_default()
    }
}
