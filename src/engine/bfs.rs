//! Level-order expansion up to `max_hops`, time-budget accounting, and
//! pagination of the assembled result set.
//!
//! Concurrency model: serial across hops, parallel across batches within
//! one hop (`engine::batch`). `visited` and the path store are shared
//! across a hop's batches only for read-only, point-in-time membership
//! checks; every batch returns candidates without mutating either, and
//! this module performs the single authoritative serial merge per hop —
//! the "clean design" the traversal's design notes call for, adopted here
//! as the actual architecture rather than left as a hazard to avoid.

use super::batch;
use super::{Engine, FrontierEntry};
use crate::error::Result;
use crate::model::{GraphFilters, LineageDirection, LineageRelationship, LineageResponse, Urn};
use crate::paths::PathStore;
use crate::visited::VisitedSet;
use rustc_hash::FxHashMap;
use std::time::Instant;

pub(crate) async fn run(
    engine: &Engine,
    root: Urn,
    direction: LineageDirection,
    filters: GraphFilters,
    offset: usize,
    count: usize,
    max_hops: u32,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Result<LineageResponse> {
    let Some(root_entity_type) = root.entity_type_hint().map(str::to_string) else {
        // No recoverable entity type for the root: the registry cannot be
        // consulted for it, so there is nothing to expand.
        return Ok(LineageResponse { total: 0, relationships: Vec::new() });
    };

    let visited = VisitedSet::new(root.clone());
    let mut path_store = PathStore::new();
    let mut frontier = vec![FrontierEntry { urn: root, entity_type: root_entity_type }];
    let mut results: Vec<LineageRelationship> = Vec::new();
    let deadline = Instant::now() + engine.config().timeout;

    for hop in 1..=max_hops {
        if frontier.is_empty() {
            break;
        }
        if Instant::now() >= deadline {
            tracing::info!(hop, "lineage traversal deadline reached before starting hop");
            break;
        }

        let candidates = batch::run_hop(engine, &frontier, direction, &filters, &visited, start_ms, end_ms, deadline).await?;

        let mut discovered_this_hop: FxHashMap<Urn, usize> = FxHashMap::default();
        let mut next_frontier = Vec::new();

        for candidate in candidates {
            let already_visited = visited.contains(&candidate.child);
            let existing_index = discovered_this_hop.get(&candidate.child).copied();

            if already_visited && existing_index.is_none() {
                // Revisit of an entity discovered in a strictly earlier
                // hop: a genuine cycle. Contributes neither a relationship
                // nor a path.
                continue;
            }

            let new_paths = path_store.extend_paths(&candidate.parent, &candidate.child, candidate.direction);

            match existing_index {
                Some(idx) => {
                    // A second (or later) parent reaching the same child
                    // within this hop: accumulate its paths, but the first
                    // candidate's metadata already won.
                    results[idx].paths.extend(new_paths);
                }
                None => {
                    visited.insert(candidate.child.clone());
                    let relationship = LineageRelationship {
                        relationship_type: candidate.relationship_type,
                        entity: candidate.child.clone(),
                        degree: hop,
                        paths: new_paths,
                        created_on: candidate.created_on,
                        created_actor: candidate.created_actor,
                        updated_on: candidate.updated_on,
                        updated_actor: candidate.updated_actor,
                        is_manual: candidate.is_manual,
                    };
                    discovered_this_hop.insert(candidate.child.clone(), results.len());
                    results.push(relationship);
                    next_frontier.push(FrontierEntry { urn: candidate.child, entity_type: candidate.child_entity_type });
                }
            }
        }

        tracing::debug!(hop, discovered = next_frontier.len(), "lineage traversal hop complete");
        frontier = next_frontier;
    }

    let total = results.len();
    if offset >= total {
        return Ok(LineageResponse { total, relationships: Vec::new() });
    }
    let end = (offset + count).min(total);
    Ok(LineageResponse { total, relationships: results[offset..end].to_vec() })
}
