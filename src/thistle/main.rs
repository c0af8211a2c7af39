// Copyright: Kyler Chin <kyler@catenarymaps.org>
// Catenary Transit Initiatives
// Removal of the attribution is not allowed, as covered under the AGPL license

use anyhow::{Context, Result};
use clap::Parser;
use nettle::config::ValidatorConfig;
use nettle::export;
use nettle::osm::loader::load_pbf;
use nettle::spatial::PointIndex;
use nettle::sweep::sweep;
use nettle::validations::CloseNodes;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OSM extract to check.
    #[arg(long, env = "NETTLE_PBF")]
    pbf: PathBuf,

    /// RON file overriding thresholds. Defaults apply when omitted.
    #[arg(long, env = "NETTLE_CONFIG")]
    config: Option<PathBuf>,

    /// Write issue anchors as a GeoJSON FeatureCollection
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Write issues as a JSON array
    #[arg(long)]
    json: Option<PathBuf>,

    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = match &args.config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };

    let graph = load_pbf(&args.pbf).with_context(|| format!("loading {}", args.pbf.display()))?;
    info!(
        "Graph ready: {} nodes, {} ways, {} relations",
        graph.node_count(),
        graph.way_count(),
        graph.relation_count()
    );

    let index = PointIndex::build(&graph);
    info!("Indexed {} points", index.len());

    let validator = CloseNodes::with_config(&index, config);
    let report = sweep(&graph, &validator);

    if let Some(path) = &args.geojson {
        fs::write(path, export::to_geojson_string(&report.issues, &graph))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote GeoJSON to {}", path.display());
    }

    if let Some(path) = &args.json {
        let records = export::to_records(&report.issues, &graph);
        fs::write(path, serde_json::to_string_pretty(&records)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote JSON to {}", path.display());
    }

    info!(
        "{} issues ({} close vertex pairs, {} stacked points) across {} entities",
        report.issues.len(),
        report.vertex_issues,
        report.detached_issues,
        report.entities_checked
    );

    Ok(())
}
