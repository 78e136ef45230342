//! Core data types shared by every component of the traversal engine:
//! urns, edge descriptors, the documents a search backend returns, and the
//! relationships/paths the engine produces.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An opaque, typed entity identifier.
///
/// Equality and hashing are structural over the raw string form; entity-type
/// comparisons elsewhere in the engine are explicitly lower-cased at the
/// comparison site rather than normalized here, since the raw form is also
/// used as a stable, round-trippable key.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Urn(String);

impl Urn {
    /// Wraps a raw urn string.
    pub fn new(raw: impl Into<String>) -> Self {
        Urn(raw.into())
    }

    /// The raw string form, e.g. `"urn:li:dataset:(urn:li:dataPlatform:hive,foo,PROD)"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entity-type segment of the urn, e.g. `"dataset"`.
    ///
    /// Lineage urns in this domain follow `urn:li:<entityType>:...`; entities
    /// that do not follow that convention simply have no recoverable type
    /// here and callers should track entity type out of band (as
    /// [`EdgeDocument`] already does, separately from the urn string).
    pub fn entity_type_hint(&self) -> Option<&str> {
        self.0.splitn(4, ':').nth(2)
    }
}

impl std::fmt::Display for Urn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a lineage request, as supplied by the caller of
/// [`crate::engine::get_lineage`].
///
/// Distinct from [`EdgeDirection`]: this one only selects which side of the
/// registry is consulted when building the initial set of valid edges for
/// an entity type. It never appears on a discovered relationship.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LineageDirection {
    /// Walk edges that point toward the root (what the root depends on).
    Upstream,
    /// Walk edges that originate from the root (what depends on the root).
    Downstream,
}

/// Direction of a single matched edge relative to the frontier urn that
/// anchored it.
///
/// `Outgoing` means the frontier urn was the edge's `source`; the path
/// grows by *prepending* the new child so the root stays at the tail.
/// `Incoming` means the frontier urn was the edge's `destination`; the path
/// grows by *appending* the new child so the root stays at the head.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Edge runs from the frontier urn toward the newly discovered child.
    Outgoing,
    /// Edge runs from the newly discovered child toward the frontier urn.
    Incoming,
}

/// A registry descriptor: one structurally valid edge kind for some entity
/// type, in some direction, toward some opposite entity type.
///
/// Two `EdgeInfo` values are equal only when relationship type, direction,
/// and opposite entity type all match — all three are part of identity.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeInfo {
    /// The relationship type name, e.g. `"DownstreamOf"`.
    pub relationship_type: String,
    /// Which side of the edge document the anchoring entity type appears on.
    pub direction: EdgeDirection,
    /// The entity type expected on the other end of the edge.
    ///
    /// Compared case-insensitively against [`EdgeDocument`] entity types by
    /// callers; stored here exactly as returned by the registry.
    pub opposite_entity_type: String,
}

/// One endpoint of an [`EdgeDocument`]: a urn plus its entity type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEndpoint {
    /// The endpoint's urn.
    pub urn: Urn,
    /// The endpoint's entity type, e.g. `"dataset"`.
    pub entity_type: String,
}

/// A single edge record as stored in the search index.
///
/// This is the unit the [`crate::search::SearchClient`] trait returns hits
/// as; the engine never writes these, only reads and interprets them. Field
/// names follow the index's camelCase wire shape (`relationshipType`,
/// `createdOn`, ...) rather than this crate's Rust naming convention.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDocument {
    /// Source endpoint of the edge.
    pub source: EdgeEndpoint,
    /// Destination endpoint of the edge.
    pub destination: EdgeEndpoint,
    /// The relationship type name, e.g. `"Produces"`.
    pub relationship_type: String,
    /// Epoch-millisecond creation time, if known.
    #[serde(default)]
    pub created_on: Option<i64>,
    /// Urn of the actor that created the edge, if known.
    #[serde(default)]
    pub created_actor: Option<String>,
    /// Epoch-millisecond last-update time, if known.
    #[serde(default)]
    pub updated_on: Option<i64>,
    /// Urn of the actor that last updated the edge, if known.
    #[serde(default)]
    pub updated_actor: Option<String>,
    /// Free-form properties. `properties.source == "UI"` marks a manually
    /// authored edge, exempt from time-range filtering.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl EdgeDocument {
    /// Whether this edge was manually authored, per the configured sentinel
    /// value of `properties.source` (`"UI"` by default).
    pub fn is_manual(&self, manual_sentinel: &str) -> bool {
        self.properties
            .get("source")
            .map(|v| v == manual_sentinel)
            .unwrap_or(false)
    }
}

/// An ordered sequence of urns from the traversal root to a discovered
/// entity.
///
/// For [`EdgeDirection::Outgoing`] growth the root sits at the tail and new
/// children are prepended; for [`EdgeDirection::Incoming`] growth the root
/// sits at the head and new children are appended. A path always contains
/// both endpoints of every hop it represents, so `path.len() == degree + 1`.
pub type Path = Vec<Urn>;

/// One discovered entity and everything the traversal learned about how it
/// was reached.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageRelationship {
    /// The relationship type of the edge that first established this entry
    /// (see the metadata-winner note in `DESIGN.md` for same-hop ties).
    #[serde(rename = "type")]
    pub relationship_type: String,
    /// The discovered entity.
    pub entity: Urn,
    /// Hop number at which this entity was first discovered, starting at 1.
    pub degree: u32,
    /// Every distinct path from the root to this entity discovered by the
    /// traversal. Always non-empty.
    pub paths: Vec<Path>,
    /// Creation time of the winning edge, if known.
    pub created_on: Option<i64>,
    /// Creation actor of the winning edge, if known.
    pub created_actor: Option<String>,
    /// Last-update time of the winning edge, if known.
    pub updated_on: Option<i64>,
    /// Last-update actor of the winning edge, if known.
    pub updated_actor: Option<String>,
    /// Whether the winning edge was manually authored.
    pub is_manual: bool,
}

/// Caller-supplied narrowing of which entity types participate in a
/// traversal.
///
/// An empty `allowed_entity_types` means unrestricted: the filter exists to
/// narrow an otherwise-unbounded traversal, so an unpopulated list is taken
/// as "no restriction was requested" rather than "nothing matches".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphFilters {
    /// Entity types (compared case-insensitively) permitted on either side
    /// of an edge considered by this traversal. Empty means unrestricted.
    pub allowed_entity_types: Vec<String>,
}

impl GraphFilters {
    /// An unrestricted filter set.
    pub fn unrestricted() -> Self {
        GraphFilters::default()
    }

    /// Whether `entity_type` passes this filter.
    pub fn allows(&self, entity_type: &str) -> bool {
        self.allowed_entity_types.is_empty()
            || self
                .allowed_entity_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(entity_type))
    }
}

/// The result of one [`crate::engine::Engine::get_lineage`] call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LineageResponse {
    /// Total number of relationships discovered before `offset`/`count`
    /// slicing was applied. Invariant under pagination.
    pub total: usize,
    /// The requested page of relationships, ordered by ascending degree.
    pub relationships: Vec<LineageRelationship>,
}
