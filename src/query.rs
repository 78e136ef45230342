//! Translates frontier urns, registry edge sets, entity-type filters, and
//! time ranges into the [`crate::search::Query`] AST.

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::model::{EdgeDirection, EdgeInfo, GraphFilters, Urn};
use crate::search::Query;

/// A single equality (or, structurally, comparison) predicate on one field
/// of an edge document's source or destination side.
///
/// Only [`Condition::Equal`] is implemented by this engine — the others
/// exist because the upstream filter DSL this crate's callers use carries
/// them, and [`QueryBuilder::build_static_edge_query`] must reject them by
/// name rather than silently ignore them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    /// Field equals the supplied value. The only condition this engine
    /// knows how to compile.
    Equal,
    /// Field is greater than the supplied value. Rejected.
    GreaterThan,
    /// Field is less than the supplied value. Rejected.
    LessThan,
    /// Field contains the supplied value as a substring. Rejected.
    Contains,
    /// Field starts with the supplied value. Rejected.
    StartsWith,
}

/// One field/condition/value predicate.
#[derive(Clone, Debug)]
pub struct Criterion {
    /// Unprefixed field name, e.g. `"platform"`. [`QueryBuilder`] applies
    /// the `source.`/`destination.` prefix according to which side it is
    /// compiled for.
    pub field: String,
    /// The comparison condition.
    pub condition: Condition,
    /// The value to compare against.
    pub value: String,
}

/// A conjunction (AND) of [`Criterion`]s.
#[derive(Clone, Debug, Default)]
pub struct ConjunctiveCriterion {
    /// Criteria that must all match.
    pub criteria: Vec<Criterion>,
}

/// A disjunction (OR) of [`ConjunctiveCriterion`]s — the filter DSL's
/// top-level shape.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Conjunctions, any one of which satisfies the filter.
    pub conjunctions: Vec<ConjunctiveCriterion>,
}

/// Compiles traversal state into [`Query`] ASTs.
///
/// Holds only a `&Config` (for `manual_sentinel`); it carries no other
/// state and is cheap to construct per hop or per batch.
pub struct QueryBuilder<'a> {
    config: &'a Config,
}

impl<'a> QueryBuilder<'a> {
    /// Builds a query builder bound to `config`.
    pub fn new(config: &'a Config) -> Self {
        QueryBuilder { config }
    }

    /// Builds the query for one `(entity type, urn subset)` partition of a
    /// batch: a disjunction of an outgoing sub-query (urns on the `source`
    /// side) and an incoming sub-query (urns on the `destination` side),
    /// narrowed by `filters` and, if present, the time-range conjuncts.
    ///
    /// Either branch is omitted if `edges` has no entries of that
    /// direction; both can never be empty simultaneously for a non-empty
    /// `edges` list.
    pub fn build_frontier_query(
        &self,
        urns: &[Urn],
        edges: &[EdgeInfo],
        filters: &GraphFilters,
        start_ms: Option<i64>,
        end_ms: Option<i64>,
    ) -> Query {
        let urn_values: Vec<String> = urns.iter().map(|u| u.as_str().to_string()).collect();
        let allowed: Vec<String> = filters
            .allowed_entity_types
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        let outgoing_types: Vec<String> = edges
            .iter()
            .filter(|e| e.direction == EdgeDirection::Outgoing)
            .map(|e| e.relationship_type.clone())
            .collect();
        let incoming_types: Vec<String> = edges
            .iter()
            .filter(|e| e.direction == EdgeDirection::Incoming)
            .map(|e| e.relationship_type.clone())
            .collect();

        let mut branches = Vec::with_capacity(2);
        if !outgoing_types.is_empty() {
            branches.push(self.anchored_branch("source.urn", &urn_values, outgoing_types, &allowed));
        }
        if !incoming_types.is_empty() {
            branches.push(self.anchored_branch("destination.urn", &urn_values, incoming_types, &allowed));
        }

        let mut top = vec![Query::should(branches, 1)];
        if let Some(start) = start_ms {
            top.push(self.start_time_filter(start));
        }
        if let Some(end) = end_ms {
            top.push(self.end_time_filter(end));
        }
        Query::must(top)
    }

    fn anchored_branch(
        &self,
        anchor_field: &str,
        urn_values: &[String],
        relationship_types: Vec<String>,
        allowed: &[String],
    ) -> Query {
        let mut must = vec![
            Query::Terms { field: anchor_field.to_string(), values: urn_values.to_vec() },
            Query::Terms { field: "relationshipType".to_string(), values: relationship_types },
        ];
        if !allowed.is_empty() {
            must.push(Query::Terms { field: "source.entityType".to_string(), values: allowed.to_vec() });
            must.push(Query::Terms { field: "destination.entityType".to_string(), values: allowed.to_vec() });
        }
        Query::must(must)
    }

    /// `updatedOn >= start OR createdOn >= start OR both absent OR manual`.
    fn start_time_filter(&self, start: i64) -> Query {
        Query::should(
            vec![
                Query::Range { field: "updatedOn".to_string(), gte: Some(start), lte: None },
                Query::Range { field: "createdOn".to_string(), gte: Some(start), lte: None },
                self.timestamps_absent(),
                self.manual_edge(),
            ],
            1,
        )
    }

    /// `createdOn <= end OR both absent OR manual`.
    fn end_time_filter(&self, end: i64) -> Query {
        Query::should(
            vec![
                Query::Range { field: "createdOn".to_string(), gte: None, lte: Some(end) },
                self.timestamps_absent(),
                self.manual_edge(),
            ],
            1,
        )
    }

    fn timestamps_absent(&self) -> Query {
        Query::must_not(vec![
            Query::Exists { field: "createdOn".to_string() },
            Query::Exists { field: "updatedOn".to_string() },
        ])
    }

    fn manual_edge(&self) -> Query {
        Query::Term { field: "properties.source".to_string(), value: self.config.manual_sentinel.to_string() }
    }

    /// Builds a query for non-lineage edge search: source-type terms,
    /// source-side filter, destination-type terms, destination-side
    /// filter, and a relationship-type disjunction.
    ///
    /// Fails with [`EngineError::InvalidFilterCondition`] if any criterion
    /// in `source_filter`/`dest_filter` uses a condition other than
    /// [`Condition::Equal`].
    pub fn build_static_edge_query(
        &self,
        source_types: &[String],
        source_filter: Option<&Filter>,
        dest_types: &[String],
        dest_filter: Option<&Filter>,
        relationship_types: &[String],
    ) -> Result<Query> {
        let mut must = Vec::new();
        if !source_types.is_empty() {
            must.push(Query::Terms {
                field: "source.entityType".to_string(),
                values: source_types.iter().map(|t| t.to_lowercase()).collect(),
            });
        }
        if let Some(filter) = source_filter {
            must.push(self.compile_filter(filter, "source")?);
        }
        if !dest_types.is_empty() {
            must.push(Query::Terms {
                field: "destination.entityType".to_string(),
                values: dest_types.iter().map(|t| t.to_lowercase()).collect(),
            });
        }
        if let Some(filter) = dest_filter {
            must.push(self.compile_filter(filter, "destination")?);
        }
        if !relationship_types.is_empty() {
            must.push(Query::Terms {
                field: "relationshipType".to_string(),
                values: relationship_types.to_vec(),
            });
        }
        Ok(Query::must(must))
    }

    fn compile_filter(&self, filter: &Filter, side: &str) -> Result<Query> {
        let mut disjuncts = Vec::with_capacity(filter.conjunctions.len());
        for conjunction in &filter.conjunctions {
            let mut conjuncts = Vec::with_capacity(conjunction.criteria.len());
            for criterion in &conjunction.criteria {
                if criterion.condition != Condition::Equal {
                    return Err(EngineError::InvalidFilterCondition { field: criterion.field.clone() });
                }
                conjuncts.push(Query::Term {
                    field: format!("{side}.{}", criterion.field),
                    value: criterion.value.clone(),
                });
            }
            disjuncts.push(Query::must(conjuncts));
        }
        Ok(Query::should(disjuncts, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeDocument;

    fn doc(source: &str, source_type: &str, dest: &str, dest_type: &str, rel: &str) -> EdgeDocument {
        use crate::model::EdgeEndpoint;
        use std::collections::HashMap;
        EdgeDocument {
            source: EdgeEndpoint { urn: Urn::new(source), entity_type: source_type.to_string() },
            destination: EdgeEndpoint { urn: Urn::new(dest), entity_type: dest_type.to_string() },
            relationship_type: rel.to_string(),
            created_on: None,
            created_actor: None,
            updated_on: None,
            updated_actor: None,
            properties: HashMap::new(),
        }
    }

    #[test]
    fn build_static_edge_query_compiles_equal_only_filters() {
        let config = Config::default();
        let qb = QueryBuilder::new(&config);

        let source_filter = Filter {
            conjunctions: vec![ConjunctiveCriterion {
                criteria: vec![Criterion { field: "urn".to_string(), condition: Condition::Equal, value: "urn:li:dataset:a".to_string() }],
            }],
        };

        let query = qb
            .build_static_edge_query(
                &["dataset".to_string()],
                Some(&source_filter),
                &["dataset".to_string()],
                None,
                &["DownstreamOf".to_string()],
            )
            .expect("EQUAL-only filters must compile");

        let matching = doc("urn:li:dataset:a", "dataset", "urn:li:dataset:b", "dataset", "DownstreamOf");
        let wrong_source = doc("urn:li:dataset:zzz", "dataset", "urn:li:dataset:b", "dataset", "DownstreamOf");

        assert!(query.matches(&matching));
        assert!(!query.matches(&wrong_source));
    }

    #[test]
    fn build_static_edge_query_rejects_non_equal_condition() {
        let config = Config::default();
        let qb = QueryBuilder::new(&config);

        let source_filter = Filter {
            conjunctions: vec![ConjunctiveCriterion {
                criteria: vec![Criterion { field: "createdOn".to_string(), condition: Condition::GreaterThan, value: "1000".to_string() }],
            }],
        };

        let err = qb
            .build_static_edge_query(&["dataset".to_string()], Some(&source_filter), &[], None, &[])
            .expect_err("a non-EQUAL condition must be rejected");

        match err {
            EngineError::InvalidFilterCondition { field } => assert_eq!(field, "createdOn"),
            other => panic!("expected InvalidFilterCondition, got {other:?}"),
        }
    }
}
