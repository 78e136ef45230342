//! Small demo binary: seeds the in-memory [`lineage_graph::search::SearchClient`]
//! and [`lineage_graph::registry::Registry`] doubles from a JSON fixture and
//! runs a single lineage traversal, printing the result as JSON or an
//! indented tree.
//!
//! This is a supplement over the engine proper — a real search-backend
//! integration is out of scope for this crate, so there is nothing to
//! administer here beyond "load a fixture, run a query, print it".

use clap::{Parser, ValueEnum};
use lineage_graph::engine::Engine;
use lineage_graph::model::{EdgeDocument, EdgeInfo, GraphFilters, LineageDirection, LineageResponse, Urn};
use lineage_graph::registry::SimpleRegistry;
use lineage_graph::search::{FixedIndexName, InMemorySearchClient};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "lineage-cli", version, about = "Run a lineage traversal against a JSON fixture")]
struct Cli {
    /// Root urn to traverse from, e.g. `urn:li:dataset:(urn:li:dataPlatform:hive,foo,PROD)`.
    #[arg(long)]
    root: String,

    /// Traversal direction.
    #[arg(long, value_enum, default_value_t = DirectionArg::Upstream)]
    direction: DirectionArg,

    /// Maximum hop depth.
    #[arg(long, default_value_t = 3)]
    max_hops: u32,

    /// Result offset for pagination.
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Result count for pagination.
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Entity types to restrict the traversal to (repeatable). Empty means unrestricted.
    #[arg(long = "allowed-entity-type")]
    allowed_entity_types: Vec<String>,

    /// Lower bound of the `[startMs, endMs]` time-range filter.
    #[arg(long)]
    start_ms: Option<i64>,

    /// Upper bound of the `[startMs, endMs]` time-range filter.
    #[arg(long)]
    end_ms: Option<i64>,

    /// Path to a JSON fixture with `edges` and `registry` arrays.
    #[arg(long, value_name = "FILE")]
    fixture: PathBuf,

    /// Logical index name to report in logs (the in-memory search client
    /// ignores it beyond that).
    #[arg(long, default_value = "graph_edge_v2")]
    index_name: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Upstream,
    Downstream,
}

impl From<DirectionArg> for LineageDirection {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Upstream => LineageDirection::Upstream,
            DirectionArg::Downstream => LineageDirection::Downstream,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Tree,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryEntry {
    entity_type: String,
    direction: LineageDirection,
    edges: Vec<EdgeInfo>,
}

#[derive(Deserialize)]
struct Fixture {
    edges: Vec<EdgeDocument>,
    #[serde(default)]
    registry: Vec<RegistryEntry>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    lineage_graph::logging::init_tracing();

    let cli = Cli::parse();
    let fixture_text = fs::read_to_string(&cli.fixture)?;
    let fixture: Fixture = serde_json::from_str(&fixture_text)?;

    let search = InMemorySearchClient::seeded(fixture.edges);

    let mut registry = SimpleRegistry::new();
    for entry in fixture.registry {
        registry.register(entry.entity_type, entry.direction, entry.edges);
    }

    let engine = Engine::new(Arc::new(registry), Arc::new(search), Arc::new(FixedIndexName(cli.index_name)));

    let filters = GraphFilters { allowed_entity_types: cli.allowed_entity_types };
    let response = engine
        .get_lineage(
            Urn::new(cli.root),
            cli.direction.into(),
            filters,
            cli.offset,
            cli.count,
            cli.max_hops,
            cli.start_ms,
            cli.end_ms,
        )
        .await?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Tree => print_tree(&response),
    }
    engine.metrics().print_report();

    Ok(())
}

fn print_tree(response: &LineageResponse) {
    println!("total={}", response.total);
    for relationship in &response.relationships {
        println!(
            "  [{}] {} (degree {}, {} path{})",
            relationship.relationship_type,
            relationship.entity,
            relationship.degree,
            relationship.paths.len(),
            if relationship.paths.len() == 1 { "" } else { "s" }
        );
        for path in &relationship.paths {
            let rendered: Vec<String> = path.iter().map(|u| u.as_str().to_string()).collect();
            println!("    {}", rendered.join(" -> "));
        }
    }
}
