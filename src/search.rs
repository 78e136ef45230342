//! The search-backend interface consumed by the traversal engine, plus a
//! small boolean-query AST it compiles into.
//!
//! The real search client (indexing, cluster management, transport-level
//! retries) is out of scope for this crate — only the query/response shape
//! it must support is modeled here, alongside an in-memory double used by
//! tests, the CLI fixture runner, and benches.

use crate::error::Result;
use crate::metrics::EngineMetrics;
use crate::model::EdgeDocument;
use std::time::{Duration, Instant};

/// Resolves the logical index name a query should run against.
///
/// Kept as a trait rather than a plain string so callers can wire in
/// environment- or tenant-specific naming conventions.
pub trait IndexNaming: Send + Sync {
    /// The concrete index name to query.
    fn index_name(&self) -> &str;
}

/// An [`IndexNaming`] that always resolves to the same fixed name.
#[derive(Clone, Debug)]
pub struct FixedIndexName(pub String);

impl IndexNaming for FixedIndexName {
    fn index_name(&self) -> &str {
        &self.0
    }
}

/// One matched document, as returned by a search call.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// The decoded `_source` body of the hit.
    pub source: EdgeDocument,
    /// Opaque sort key, present when the backend was asked to sort results
    /// (used by [`SearchClient::search_after`] pagination).
    pub sort_key: Option<serde_json::Value>,
}

/// The result of one search call.
#[derive(Clone, Debug, Default)]
pub struct SearchResponse {
    /// The page of hits returned.
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents, independent of page size.
    pub total: usize,
    /// Point-in-time id to keep using for subsequent `search_after` calls,
    /// if the backend issued one.
    pub point_in_time_id: Option<String>,
}

/// The search primitive the traversal engine is built against.
///
/// Implementations are expected to be synchronous and blocking (modeling an
/// out-of-process RPC); the engine dispatches calls onto the async
/// runtime's blocking thread pool rather than requiring an async trait —
/// this codebase has no `async_trait` dependency, so collaborator traits
/// stay plain `Sync` traits.
pub trait SearchClient: Send + Sync {
    /// Runs `query` against `index`, returning at most `size` hits starting
    /// at offset `from`.
    fn search(&self, index: &str, query: &Query, size: usize, from: usize) -> Result<SearchResponse>;

    /// Streaming variant used by callers outside the BFS path (e.g. bulk
    /// export tools). Not called by the BFS controller itself.
    fn search_after(
        &self,
        index: &str,
        query: &Query,
        sort_key: Option<serde_json::Value>,
        point_in_time_id: Option<&str>,
        keep_alive: Duration,
        size: usize,
    ) -> Result<SearchResponse>;
}

/// Convenience wrapper over [`SearchClient::search_after`] that drains an
/// entire matching set, for callers (outside the BFS path) that need a full
/// dump of an index's edges rather than a bounded traversal.
///
/// Every page fetched records one [`EngineMetrics::record_search`] call,
/// same as a BFS batch's search — `search_after` is still a search issued
/// against the backend and is covered by the same `num_elasticSearch_reads`/
/// `esQuery` contract.
pub fn scan_all(
    client: &dyn SearchClient,
    index: &str,
    query: &Query,
    keep_alive: Duration,
    page_size: usize,
    metrics: &EngineMetrics,
) -> Result<Vec<EdgeDocument>> {
    let mut out = Vec::new();
    let mut sort_key = None;
    let mut pit = None;
    loop {
        let started = Instant::now();
        let response = client.search_after(index, query, sort_key.clone(), pit.as_deref(), keep_alive, page_size)?;
        metrics.record_search(started.elapsed());
        if response.hits.is_empty() {
            break;
        }
        sort_key = response.hits.last().and_then(|h| h.sort_key.clone());
        pit = response.point_in_time_id.clone();
        let got = response.hits.len();
        out.extend(response.hits.into_iter().map(|h| h.source));
        if got < page_size {
            break;
        }
    }
    Ok(out)
}

/// A boolean query over [`EdgeDocument`] fields.
///
/// Deliberately small: this engine only ever needs term/terms equality,
/// numeric range, field-existence, and boolean composition — there is no
/// free-text or fuzzy matching in a lineage edge document.
#[derive(Clone, Debug)]
pub enum Query {
    /// Matches every document.
    MatchAll,
    /// Matches when `field` resolves to exactly `value`.
    Term {
        /// Dotted field path, e.g. `"source.urn"`.
        field: String,
        /// Value `field` must equal.
        value: String,
    },
    /// Matches when `field` resolves to any of `values`.
    Terms {
        /// Dotted field path.
        field: String,
        /// Set of values `field` may equal.
        values: Vec<String>,
    },
    /// Matches when a numeric field falls within `[gte, lte]` (either bound
    /// may be absent).
    Range {
        /// Dotted field path; only `createdOn`/`updatedOn` are numeric.
        field: String,
        /// Inclusive lower bound, if any.
        gte: Option<i64>,
        /// Inclusive upper bound, if any.
        lte: Option<i64>,
    },
    /// Matches when `field` is present on the document.
    Exists {
        /// Dotted field path.
        field: String,
    },
    /// Boolean composition of sub-queries.
    Bool(BoolQuery),
}

/// A conjunction/disjunction/negation composition of [`Query`] clauses,
/// modeled after the `must`/`should`/`must_not` shape search backends in
/// this domain expose.
#[derive(Clone, Debug, Default)]
pub struct BoolQuery {
    /// Every clause must match (AND).
    pub must: Vec<Query>,
    /// At least `minimum_should_match` clauses must match (OR, by default
    /// requiring one).
    pub should: Vec<Query>,
    /// No clause may match (NOR).
    pub must_not: Vec<Query>,
    /// Minimum number of `should` clauses required to match. Treated as 1
    /// when `should` is non-empty and this is left at 0.
    pub minimum_should_match: usize,
}

impl Query {
    /// Builds a conjunction (`AND`) of `clauses`.
    pub fn must(clauses: Vec<Query>) -> Query {
        Query::Bool(BoolQuery { must: clauses, ..BoolQuery::default() })
    }

    /// Builds a disjunction (`OR`) of `clauses`, requiring at least
    /// `minimum_should_match` of them (0 is normalized to 1).
    pub fn should(clauses: Vec<Query>, minimum_should_match: usize) -> Query {
        Query::Bool(BoolQuery {
            should: clauses,
            minimum_should_match,
            ..BoolQuery::default()
        })
    }

    /// Builds a negation (`NOR`) of `clauses`: matches when none of them do.
    pub fn must_not(clauses: Vec<Query>) -> Query {
        Query::Bool(BoolQuery { must_not: clauses, ..BoolQuery::default() })
    }

    /// Evaluates this query against `doc` using the in-memory field model
    /// below. Used by [`InMemorySearchClient`] and by fuzz/property tests
    /// that want to check query/document agreement without a real backend.
    pub fn matches(&self, doc: &EdgeDocument) -> bool {
        match self {
            Query::MatchAll => true,
            Query::Term { field, value } => field_of(doc, field).as_deref() == Some(value.as_str()),
            Query::Terms { field, values } => field_of(doc, field)
                .map(|v| values.iter().any(|candidate| candidate == &v))
                .unwrap_or(false),
            Query::Range { field, gte, lte } => match numeric_field_of(doc, field) {
                Some(v) => gte.map_or(true, |g| v >= g) && lte.map_or(true, |l| v <= l),
                None => false,
            },
            Query::Exists { field } => field_of(doc, field).is_some(),
            Query::Bool(b) => b.matches(doc),
        }
    }
}

impl BoolQuery {
    /// Evaluates this composition against `doc`.
    pub fn matches(&self, doc: &EdgeDocument) -> bool {
        if !self.must.iter().all(|q| q.matches(doc)) {
            return false;
        }
        if self.must_not.iter().any(|q| q.matches(doc)) {
            return false;
        }
        if !self.should.is_empty() {
            let required = self.minimum_should_match.max(1);
            let matched = self.should.iter().filter(|q| q.matches(doc)).count();
            if matched < required {
                return false;
            }
        }
        true
    }
}

/// Resolves a dotted field path against an [`EdgeDocument`]'s string-typed
/// fields. Entity-type fields are normalized to lowercase here, matching
/// the engine-wide rule that entity types compare case-insensitively.
fn field_of(doc: &EdgeDocument, path: &str) -> Option<String> {
    match path {
        "source.urn" => Some(doc.source.urn.as_str().to_string()),
        "source.entityType" => Some(doc.source.entity_type.to_lowercase()),
        "destination.urn" => Some(doc.destination.urn.as_str().to_string()),
        "destination.entityType" => Some(doc.destination.entity_type.to_lowercase()),
        "relationshipType" => Some(doc.relationship_type.clone()),
        "createdOn" => doc.created_on.map(|v| v.to_string()),
        "createdActor" => doc.created_actor.clone(),
        "updatedOn" => doc.updated_on.map(|v| v.to_string()),
        "updatedActor" => doc.updated_actor.clone(),
        other => other.strip_prefix("properties.").and_then(|key| doc.properties.get(key).cloned()),
    }
}

/// Resolves a dotted field path to a numeric value, for [`Query::Range`].
/// Only `createdOn`/`updatedOn` are numeric in this document shape.
fn numeric_field_of(doc: &EdgeDocument, path: &str) -> Option<i64> {
    match path {
        "createdOn" => doc.created_on,
        "updatedOn" => doc.updated_on,
        _ => None,
    }
}

/// An in-memory [`SearchClient`] backed by a plain `Vec<EdgeDocument>`,
/// standing in for a real search cluster in tests, the CLI fixture runner,
/// and benches.
#[derive(Clone, Debug, Default)]
pub struct InMemorySearchClient {
    documents: Vec<EdgeDocument>,
}

impl InMemorySearchClient {
    /// An empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store seeded with `documents`.
    pub fn seeded(documents: Vec<EdgeDocument>) -> Self {
        InMemorySearchClient { documents }
    }

    /// Adds one document to the store, builder-style.
    pub fn with_document(mut self, doc: EdgeDocument) -> Self {
        self.documents.push(doc);
        self
    }

    /// Appends a document to the store in place.
    pub fn index(&mut self, doc: EdgeDocument) {
        self.documents.push(doc);
    }
}

impl SearchClient for InMemorySearchClient {
    fn search(&self, _index: &str, query: &Query, size: usize, from: usize) -> Result<SearchResponse> {
        let matching: Vec<&EdgeDocument> = self.documents.iter().filter(|d| query.matches(d)).collect();
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(from)
            .take(size)
            .map(|d| SearchHit { source: d.clone(), sort_key: None })
            .collect();
        Ok(SearchResponse { hits: page, total, point_in_time_id: None })
    }

    fn search_after(
        &self,
        index: &str,
        query: &Query,
        sort_key: Option<serde_json::Value>,
        _point_in_time_id: Option<&str>,
        _keep_alive: Duration,
        size: usize,
    ) -> Result<SearchResponse> {
        let from = sort_key.and_then(|v| v.as_u64()).map(|v| v as usize).unwrap_or(0);
        let mut response = self.search(index, query, size, from)?;
        let next_offset = from + response.hits.len();
        for hit in &mut response.hits {
            hit.sort_key = Some(serde_json::json!(next_offset));
        }
        response.point_in_time_id = Some("in-memory".to_string());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeEndpoint;
    use std::collections::HashMap;
    use std::time::Duration;

    fn doc(id: &str) -> EdgeDocument {
        EdgeDocument {
            source: EdgeEndpoint { urn: crate::model::Urn::new(id), entity_type: "dataset".to_string() },
            destination: EdgeEndpoint { urn: crate::model::Urn::new("urn:li:dataset:root"), entity_type: "dataset".to_string() },
            relationship_type: "DownstreamOf".to_string(),
            created_on: None,
            created_actor: None,
            updated_on: None,
            updated_actor: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn scan_all_drains_every_page_and_records_one_search_per_page() {
        let mut client = InMemorySearchClient::new();
        for i in 0..5 {
            client.index(doc(&format!("urn:li:dataset:n{i}")));
        }
        let metrics = EngineMetrics::new();

        let docs = scan_all(&client, "graph_edge_v2", &Query::MatchAll, Duration::from_secs(60), 2, &metrics).unwrap();

        assert_eq!(docs.len(), 5);
        // 5 documents at page size 2: three pages (2, 2, 1), each recorded.
        assert_eq!(metrics.num_elastic_search_reads(), 3);
    }
}
