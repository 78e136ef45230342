#![no_main]

use libfuzzer_sys::arbitrary::{self, Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use lineage_graph::model::{EdgeDocument, EdgeEndpoint, Urn};
use lineage_graph::search::Query;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct FuzzEndpoint {
    urn: String,
    entity_type: String,
}

impl<'a> Arbitrary<'a> for FuzzEndpoint {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(FuzzEndpoint { urn: String::arbitrary(u)?, entity_type: String::arbitrary(u)? })
    }
}

#[derive(Debug, Clone)]
struct FuzzDocument {
    source: FuzzEndpoint,
    destination: FuzzEndpoint,
    relationship_type: String,
    created_on: Option<i64>,
    updated_on: Option<i64>,
    manual_source: Option<String>,
}

impl<'a> Arbitrary<'a> for FuzzDocument {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(FuzzDocument {
            source: FuzzEndpoint::arbitrary(u)?,
            destination: FuzzEndpoint::arbitrary(u)?,
            relationship_type: String::arbitrary(u)?,
            created_on: Option::<i64>::arbitrary(u)?,
            updated_on: Option::<i64>::arbitrary(u)?,
            manual_source: Option::<String>::arbitrary(u)?,
        })
    }
}

fn into_document(f: FuzzDocument) -> EdgeDocument {
    let mut properties = HashMap::new();
    if let Some(v) = f.manual_source {
        properties.insert("source".to_string(), v);
    }
    EdgeDocument {
        source: EdgeEndpoint { urn: Urn::new(f.source.urn), entity_type: f.source.entity_type },
        destination: EdgeEndpoint { urn: Urn::new(f.destination.urn), entity_type: f.destination.entity_type },
        relationship_type: f.relationship_type,
        created_on: f.created_on,
        created_actor: None,
        updated_on: f.updated_on,
        updated_actor: None,
        properties,
    }
}

/// Fuzzes JSON (de)serialization round-tripping and query evaluation of an
/// arbitrary [`EdgeDocument`]. Neither path is expected to panic regardless
/// of how degenerate the strings or timestamps are.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(fuzzed) = FuzzDocument::arbitrary(&mut u) else { return };

    let _ = std::panic::catch_unwind(|| {
        let doc = into_document(fuzzed);

        if let Ok(encoded) = serde_json::to_string(&doc) {
            let _: Result<EdgeDocument, _> = serde_json::from_str(&encoded);
        }

        let is_manual = doc.is_manual("UI");
        let _ = Query::Term { field: "source.urn".to_string(), value: doc.source.urn.as_str().to_string() }.matches(&doc);
        let _ = Query::Range { field: "createdOn".to_string(), gte: doc.created_on, lte: doc.updated_on }.matches(&doc);
        let _ = Query::Exists { field: "properties.source".to_string() }.matches(&doc);
        let _ = is_manual;
    });
});
