//! Partitions one hop's frontier into fixed-size batches, dispatches one
//! search per batch concurrently, and collects results within the
//! traversal's remaining time budget.

use super::extractor::{self, Candidate};
use super::{Engine, FrontierEntry};
use crate::error::{EngineError, Result};
use crate::model::{EdgeInfo, GraphFilters, LineageDirection, Urn};
use crate::query::QueryBuilder;
use crate::search::Query;
use crate::visited::VisitedSet;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Runs one hop of the traversal: groups `frontier` by entity type,
/// consults the registry once per type, partitions into batches of
/// [`crate::config::Config::batch_size`], dispatches each batch's search
/// concurrently onto the blocking thread pool, and collects the candidates
/// every batch that completes before `deadline` produced.
///
/// A hard search error from any batch aborts the whole call immediately
/// ([`EngineError::SearchBackendError`]); a deadline overrun simply stops
/// collecting further batches and returns what has arrived so far — this is
/// the non-error [`EngineError`] policy documented at the crate root.
pub(crate) async fn run_hop(
    engine: &Engine,
    frontier: &[FrontierEntry],
    direction: LineageDirection,
    filters: &GraphFilters,
    visited: &VisitedSet,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    deadline: Instant,
) -> Result<Vec<Candidate>> {
    let mut edges_by_type: FxHashMap<String, Vec<EdgeInfo>> = FxHashMap::default();
    for entry in frontier {
        let key = entry.entity_type.to_lowercase();
        edges_by_type
            .entry(key)
            .or_insert_with(|| engine.registry().get_lineage_relationships(&entry.entity_type, direction));
    }

    // Registry-returned opposite entity types are normalized to lowercase
    // here so lookups in `extractor::extract_candidates` (which also
    // lowercases) agree regardless of what casing the registry returned.
    let valid_edges: Arc<FxHashSet<(String, EdgeInfo)>> = Arc::new(
        edges_by_type
            .iter()
            .flat_map(|(entity_type, edges)| {
                edges.iter().map(move |edge| {
                    (
                        entity_type.clone(),
                        EdgeInfo {
                            relationship_type: edge.relationship_type.clone(),
                            direction: edge.direction,
                            opposite_entity_type: edge.opposite_entity_type.to_lowercase(),
                        },
                    )
                })
            })
            .collect(),
    );

    let frontier_urns: Arc<FxHashSet<Urn>> = Arc::new(frontier.iter().map(|e| e.urn.clone()).collect());
    let visited_snapshot = Arc::new(visited.snapshot());
    let query_builder = QueryBuilder::new(engine.config());

    let mut join_set: JoinSet<Result<Vec<Candidate>>> = JoinSet::new();
    let index_name = engine.index_naming().index_name().to_string();
    let manual_sentinel = engine.config().manual_sentinel;
    let max_result = engine.config().max_elastic_result;

    for batch in frontier.chunks(engine.config().batch_size) {
        let mut urns_by_type: FxHashMap<String, Vec<Urn>> = FxHashMap::default();
        for entry in batch {
            urns_by_type.entry(entry.entity_type.to_lowercase()).or_default().push(entry.urn.clone());
        }

        let mut sub_queries = Vec::with_capacity(urns_by_type.len());
        for (entity_type, urns) in &urns_by_type {
            let Some(edges) = edges_by_type.get(entity_type) else { continue };
            if edges.is_empty() {
                continue;
            }
            sub_queries.push(query_builder.build_frontier_query(urns, edges, filters, start_ms, end_ms));
        }
        if sub_queries.is_empty() {
            // No valid edges for any entity type in this batch: per the
            // error table, an empty registry result is not an error, it
            // just contributes nothing — skip the RPC entirely.
            continue;
        }
        let query: Query = Query::should(sub_queries, 1);

        let search = engine.search();
        let metrics = engine.metrics_handle();
        let frontier_urns = Arc::clone(&frontier_urns);
        let valid_edges = Arc::clone(&valid_edges);
        let visited_snapshot = Arc::clone(&visited_snapshot);
        let index_name = index_name.clone();
        let filters = filters.clone();

        join_set.spawn_blocking(move || -> Result<Vec<Candidate>> {
            let started = Instant::now();
            let response = search
                .search(&index_name, &query, max_result, 0)
                .map_err(|e| EngineError::SearchBackendError(e.to_string()))?;
            metrics.record_search(started.elapsed());
            Ok(extractor::extract_candidates(&response.hits, &frontier_urns, &valid_edges, &visited_snapshot, manual_sentinel, &filters))
        });
    }

    let mut candidates = Vec::new();
    loop {
        if join_set.is_empty() {
            break;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::info!(pending = join_set.len(), "lineage traversal deadline reached; abandoning in-flight batches");
            break;
        }
        match tokio::time::timeout(remaining, join_set.join_next()).await {
            Ok(Some(Ok(Ok(batch_candidates)))) => candidates.extend(batch_candidates),
            Ok(Some(Ok(Err(err)))) => {
                join_set.abort_all();
                return Err(err);
            }
            Ok(Some(Err(join_err))) => {
                join_set.abort_all();
                return Err(EngineError::SearchBackendError(join_err.to_string()));
            }
            Ok(None) => break,
            Err(_elapsed) => {
                tracing::info!("lineage traversal deadline reached while awaiting a batch");
                break;
            }
        }
    }
    join_set.abort_all();

    Ok(candidates)
}
