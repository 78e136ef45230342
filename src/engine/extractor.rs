//! Decodes search hits into typed relationship candidates, validating every
//! hit against the registry's valid-edge set before it is allowed to extend
//! the traversal.

use crate::model::{EdgeDirection, EdgeInfo, GraphFilters, Urn};
use crate::search::SearchHit;
use rustc_hash::FxHashSet;

/// One proposed relationship a batch discovered, not yet merged into the
/// shared visited set / path store.
///
/// Candidates are produced without touching any shared mutable state (see
/// the message-passing note in `engine::bfs`); the BFS controller folds
/// them serially after every batch of a hop has reported in.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// The frontier urn this edge was anchored on.
    pub parent: Urn,
    /// The newly discovered urn.
    pub child: Urn,
    /// Entity type of `child`, needed to group the next hop's frontier by
    /// type without re-deriving it from the urn string.
    pub child_entity_type: String,
    /// Which side of the edge document `parent` appeared on, and therefore
    /// which way the path for `child` must grow.
    pub direction: EdgeDirection,
    /// Relationship type of the matched edge.
    pub relationship_type: String,
    /// Creation time of the matched edge, if known.
    pub created_on: Option<i64>,
    /// Creation actor of the matched edge, if known.
    pub created_actor: Option<String>,
    /// Last-update time of the matched edge, if known.
    pub updated_on: Option<i64>,
    /// Last-update actor of the matched edge, if known.
    pub updated_actor: Option<String>,
    /// Whether the matched edge was manually authored.
    pub is_manual: bool,
}

/// Decodes every hit in `hits`, attempting both an outgoing match (the
/// frontier urn anchors the edge's `source` side) and an incoming match
/// (the frontier urn anchors the `destination` side) independently.
///
/// A single hit may produce both a candidate and its mirror if both
/// endpoints are in `frontier` and both `(entityType, EdgeInfo)` pairs are
/// valid — this is intended BFS behavior (the "bowtie" case), not a bug.
///
/// `visited_snapshot` is a point-in-time copy taken before the hop's
/// batches were dispatched; it only filters out genuine re-visits from
/// prior hops as an early-exit optimization; the BFS controller performs
/// the authoritative check (including convergence within the same hop)
/// once all of a hop's candidates are collected.
///
/// `filters` is re-checked here against the discovered child's entity type
/// even though the dispatched query already constrained entity types — the
/// same defensive posture as the registry re-check above, for a backend
/// that returned a hit it should not have.
pub fn extract_candidates(
    hits: &[SearchHit],
    frontier: &FxHashSet<Urn>,
    valid_edges: &FxHashSet<(String, EdgeInfo)>,
    visited_snapshot: &FxHashSet<Urn>,
    manual_sentinel: &str,
    filters: &GraphFilters,
) -> Vec<Candidate> {
    let mut out = Vec::new();

    for hit in hits {
        let doc = &hit.source;
        let is_manual = doc.is_manual(manual_sentinel);

        if frontier.contains(&doc.source.urn) && !visited_snapshot.contains(&doc.destination.urn) && filters.allows(&doc.destination.entity_type) {
            let key = (
                doc.source.entity_type.to_lowercase(),
                EdgeInfo {
                    relationship_type: doc.relationship_type.clone(),
                    direction: EdgeDirection::Outgoing,
                    opposite_entity_type: doc.destination.entity_type.to_lowercase(),
                },
            );
            if valid_edges.contains(&key) {
                out.push(Candidate {
                    parent: doc.source.urn.clone(),
                    child: doc.destination.urn.clone(),
                    child_entity_type: doc.destination.entity_type.clone(),
                    direction: EdgeDirection::Outgoing,
                    relationship_type: doc.relationship_type.clone(),
                    created_on: doc.created_on,
                    created_actor: doc.created_actor.clone(),
                    updated_on: doc.updated_on,
                    updated_actor: doc.updated_actor.clone(),
                    is_manual,
                });
            }
        }

        if frontier.contains(&doc.destination.urn) && !visited_snapshot.contains(&doc.source.urn) && filters.allows(&doc.source.entity_type) {
            let key = (
                doc.destination.entity_type.to_lowercase(),
                EdgeInfo {
                    relationship_type: doc.relationship_type.clone(),
                    direction: EdgeDirection::Incoming,
                    opposite_entity_type: doc.source.entity_type.to_lowercase(),
                },
            );
            if valid_edges.contains(&key) {
                out.push(Candidate {
                    parent: doc.destination.urn.clone(),
                    child: doc.source.urn.clone(),
                    child_entity_type: doc.source.entity_type.clone(),
                    direction: EdgeDirection::Incoming,
                    relationship_type: doc.relationship_type.clone(),
                    created_on: doc.created_on,
                    created_actor: doc.created_actor.clone(),
                    updated_on: doc.updated_on,
                    updated_actor: doc.updated_actor.clone(),
                    is_manual,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeDocument, EdgeEndpoint};
    use std::collections::HashMap;

    fn endpoint(urn: &str, entity_type: &str) -> EdgeEndpoint {
        EdgeEndpoint { urn: Urn::new(urn), entity_type: entity_type.to_string() }
    }

    fn doc(source: &str, source_type: &str, dest: &str, dest_type: &str, rel: &str) -> EdgeDocument {
        EdgeDocument {
            source: endpoint(source, source_type),
            destination: endpoint(dest, dest_type),
            relationship_type: rel.to_string(),
            created_on: None,
            created_actor: None,
            updated_on: None,
            updated_actor: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn rejects_hit_not_in_registry() {
        let hit = SearchHit { source: doc("urn:li:chart:b", "chart", "urn:li:dataset:a", "dataset", "DownstreamOf"), sort_key: None };
        let frontier: FxHashSet<Urn> = [Urn::new("urn:li:dataset:a")].into_iter().collect();
        let valid_edges: FxHashSet<(String, EdgeInfo)> = [(
            "dataset".to_string(),
            EdgeInfo { relationship_type: "DownstreamOf".to_string(), direction: EdgeDirection::Incoming, opposite_entity_type: "dataset".to_string() },
        )]
        .into_iter()
        .collect();
        let visited = FxHashSet::default();

        let candidates = extract_candidates(&[hit], &frontier, &valid_edges, &visited, "UI", &GraphFilters::unrestricted());
        assert!(candidates.is_empty());
    }

    #[test]
    fn bowtie_hit_can_match_both_sides() {
        let hit = SearchHit { source: doc("urn:li:dataset:a", "dataset", "urn:li:dataset:b", "dataset", "DownstreamOf"), sort_key: None };
        let frontier: FxHashSet<Urn> = [Urn::new("urn:li:dataset:a"), Urn::new("urn:li:dataset:b")].into_iter().collect();
        let valid_edges: FxHashSet<(String, EdgeInfo)> = [
            ("dataset".to_string(), EdgeInfo { relationship_type: "DownstreamOf".to_string(), direction: EdgeDirection::Outgoing, opposite_entity_type: "dataset".to_string() }),
            ("dataset".to_string(), EdgeInfo { relationship_type: "DownstreamOf".to_string(), direction: EdgeDirection::Incoming, opposite_entity_type: "dataset".to_string() }),
        ]
        .into_iter()
        .collect();
        let visited = FxHashSet::default();

        let candidates = extract_candidates(&[hit], &frontier, &valid_edges, &visited, "UI", &GraphFilters::unrestricted());
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn filters_reject_child_entity_type_even_when_registry_allows_it() {
        let hit = SearchHit { source: doc("urn:li:dataset:a", "dataset", "urn:li:chart:b", "chart", "Consumes"), sort_key: None };
        let frontier: FxHashSet<Urn> = [Urn::new("urn:li:dataset:a")].into_iter().collect();
        let valid_edges: FxHashSet<(String, EdgeInfo)> = [(
            "dataset".to_string(),
            EdgeInfo { relationship_type: "Consumes".to_string(), direction: EdgeDirection::Outgoing, opposite_entity_type: "chart".to_string() },
        )]
        .into_iter()
        .collect();
        let visited = FxHashSet::default();
        let filters = GraphFilters { allowed_entity_types: vec!["dataset".to_string()] };

        let candidates = extract_candidates(&[hit], &frontier, &valid_edges, &visited, "UI", &filters);
        assert!(candidates.is_empty());
    }
}
