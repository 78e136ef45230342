//! Benchmarks the BFS traversal against a synthetic layered graph, scaling
//! fan-out and depth independently to separate per-hop batching cost from
//! hop-count cost.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lineage_graph::config::Config;
use lineage_graph::engine::Engine;
use lineage_graph::model::{EdgeDirection, EdgeDocument, EdgeEndpoint, EdgeInfo, GraphFilters, LineageDirection, Urn};
use lineage_graph::registry::SimpleRegistry;
use lineage_graph::search::{FixedIndexName, InMemorySearchClient};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn endpoint(urn: String) -> EdgeEndpoint {
    EdgeEndpoint { urn: Urn::new(urn), entity_type: "dataset".to_string() }
}

fn edge(source: String, dest: String) -> EdgeDocument {
    EdgeDocument {
        source: endpoint(source),
        destination: endpoint(dest),
        relationship_type: "DownstreamOf".to_string(),
        created_on: None,
        created_actor: None,
        updated_on: None,
        updated_actor: None,
        properties: HashMap::new(),
    }
}

/// Builds a `depth`-level tree where every node has `fan_out` children, all
/// edges pointing from child to parent (so `Upstream` from the root walks
/// the whole tree).
fn build_layered_graph(depth: u32, fan_out: usize) -> (InMemorySearchClient, SimpleRegistry) {
    let mut search = InMemorySearchClient::new();
    let mut frontier = vec!["urn:li:dataset:root".to_string()];
    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * fan_out);
        for parent in &frontier {
            for i in 0..fan_out {
                let child = format!("{parent}.{level}.{i}");
                search.index(edge(child.clone(), parent.clone()));
                next.push(child);
            }
        }
        frontier = next;
    }

    let registry = SimpleRegistry::new().with(
        "dataset",
        LineageDirection::Upstream,
        vec![EdgeInfo { relationship_type: "DownstreamOf".to_string(), direction: EdgeDirection::Incoming, opposite_entity_type: "dataset".to_string() }],
    );
    (search, registry)
}

fn bench_traversal(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("lineage_traversal");

    for &(depth, fan_out) in &[(3u32, 4usize), (4, 8), (5, 4)] {
        let (search, registry) = build_layered_graph(depth, fan_out);
        let engine = Engine::new(Arc::new(registry), Arc::new(search), Arc::new(FixedIndexName("graph_edge_v2".to_string())))
            .with_config(Config { batch_size: 256, ..Config::default() });

        group.bench_with_input(BenchmarkId::new("depth_fanout", format!("{depth}x{fan_out}")), &(depth, fan_out), |b, _| {
            b.to_async(&rt).iter(|| {
                let engine = engine.clone();
                async move {
                    engine
                        .get_lineage(Urn::new("urn:li:dataset:root"), LineageDirection::Upstream, GraphFilters::unrestricted(), 0, 1000, depth, None, None)
                        .await
                        .unwrap()
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_traversal);
criterion_main!(benches);
