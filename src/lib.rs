//! # lineage_graph — a lineage graph traversal engine
//!
//! Given a starting entity urn, a direction (upstream or downstream),
//! optional entity-type and time-range filters, and a maximum hop depth,
//! [`engine::Engine::get_lineage`] returns every entity reachable through
//! structurally valid typed edges, together with the concrete paths taken
//! to reach each one.
//!
//! Edges and entities are not held as an in-memory graph: they are
//! materialized on demand by querying a search index of edge documents
//! ([`search::SearchClient`]) and checked against a registry of which
//! `(source type, relationship, destination type)` triples are valid
//! ([`registry::Registry`]). Both collaborators are traits; this crate
//! ships in-memory doubles (`search::InMemorySearchClient`,
//! `registry::SimpleRegistry`) for tests, the CLI, and benches, but no
//! production-shaped implementation — wiring in a real search cluster and
//! registry is a caller concern.
//!
//! ## Quick start
//!
//! ```rust
//! use lineage_graph::model::{EdgeDirection, EdgeDocument, EdgeEndpoint, EdgeInfo, GraphFilters, LineageDirection, Urn};
//! use lineage_graph::registry::SimpleRegistry;
//! use lineage_graph::search::{FixedIndexName, InMemorySearchClient};
//! use lineage_graph::engine::Engine;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let edge = EdgeDocument {
//!     source: EdgeEndpoint { urn: Urn::new("urn:li:dataset:b"), entity_type: "dataset".to_string() },
//!     destination: EdgeEndpoint { urn: Urn::new("urn:li:dataset:a"), entity_type: "dataset".to_string() },
//!     relationship_type: "DownstreamOf".to_string(),
//!     created_on: None,
//!     created_actor: None,
//!     updated_on: None,
//!     updated_actor: None,
//!     properties: HashMap::new(),
//! };
//! let search = InMemorySearchClient::new().with_document(edge);
//!
//! let registry = SimpleRegistry::new().with(
//!     "dataset",
//!     LineageDirection::Upstream,
//!     vec![EdgeInfo { relationship_type: "DownstreamOf".to_string(), direction: EdgeDirection::Incoming, opposite_entity_type: "dataset".to_string() }],
//! );
//!
//! let engine = Engine::new(Arc::new(registry), Arc::new(search), Arc::new(FixedIndexName("graph_edge_v2".to_string())));
//!
//! let response = engine
//!     .get_lineage(Urn::new("urn:li:dataset:a"), LineageDirection::Upstream, GraphFilters::unrestricted(), 0, 10, 1, None, None)
//!     .await
//!     .unwrap();
//! assert_eq!(response.total, 1);
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod paths;
pub mod query;
pub mod registry;
pub mod search;
pub mod visited;

pub use crate::engine::Engine;
pub use crate::error::{EngineError, Result};
pub use crate::model::{GraphFilters, LineageDirection, LineageRelationship, LineageResponse, Urn};
