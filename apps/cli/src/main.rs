// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: export a beacon topology from a selection snapshot
//!
//! The snapshot is the JSON form of a host selection (document path,
//! building name, site anchor, fixtures). The topology is written next to
//! the host document unless `--output` is given.
//!
//! Usage:
//!   bde-export <snapshot.json> [options]

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use bde_export::parse_topology;
use bde_processing::{topology_path_for, ElementProvider, ExportPipeline, ExportReport};

mod config;
mod error;
mod snapshot;

use config::Config;
use snapshot::SnapshotProvider;

struct Args {
    snapshot: PathBuf,
    output: Option<PathBuf>,
    labels: bool,
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info,bde_cli=debug".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(&args[1..]) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(report) if report.failures.is_empty() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args {
        snapshot: PathBuf::from(&args[0]),
        output: None,
        labels: false,
        check: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                let path = args.get(i).context("--output needs a path")?;
                parsed.output = Some(PathBuf::from(path));
            }
            "--labels" => parsed.labels = true,
            "--check" => parsed.check = true,
            other => bail!("Unknown option: {other}"),
        }
        i += 1;
    }
    Ok(parsed)
}

fn run(args: Args) -> anyhow::Result<ExportReport> {
    let config = Config::from_env();
    let export_config = config
        .export_config()
        .map_err(anyhow::Error::msg)
        .context("Invalid export configuration")?;

    tracing::debug!(
        length_to_meters = config.length_to_meters,
        meters_to_degrees = config.meters_to_degrees,
        allowed_types = ?config.allowed_types,
        label_failures = %config.label_failures,
        elevation_index = %config.elevation_index,
        "Loaded configuration"
    );

    let mut provider = SnapshotProvider::open(&args.snapshot)?;
    let selection = provider.selection()?;
    let output = args
        .output
        .unwrap_or_else(|| topology_path_for(&selection.document_path));

    let pipeline = ExportPipeline::new(export_config);
    let report = pipeline.run_selection(&mut provider, &selection, &output)?;

    for failure in &report.failures {
        eprintln!("  failed: {failure}");
    }
    for warning in &report.warnings {
        eprintln!("  warning: {warning}");
    }
    println!(
        "{} beacons written to {} ({} failed, {} warnings, {} skipped)",
        report.beacons.len(),
        output.display(),
        report.failures.len(),
        report.warnings.len(),
        report.skipped
    );

    if args.labels {
        let sheet = provider.labels_path();
        provider.write_labels(&sheet)?;
        println!("{} labels written to {}", provider.labels().len(), sheet.display());
    }

    if args.check {
        let xml = fs::read_to_string(&output)
            .with_context(|| format!("Cannot read back {}", output.display()))?;
        let doc = parse_topology(&xml).context("Written topology does not parse")?;
        if doc.nodes.len() != report.beacons.len() || doc.region_nodes.len() != report.beacons.len() {
            bail!(
                "Written topology has {} nodes, expected {}",
                doc.nodes.len(),
                report.beacons.len()
            );
        }
        println!("Check passed: {} nodes in {}", doc.nodes.len(), doc.building_name);
    }

    Ok(report)
}

fn print_usage() {
    eprintln!("bde-export - Beacon topology export");
    eprintln!();
    eprintln!("Usage: bde-export <snapshot.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <path>  Topology file (default: host document with .xml)");
    eprintln!("  --labels             Write placed labels to <snapshot>.labels.json");
    eprintln!("  --check              Parse the written topology back and compare");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BDE_LENGTH_TO_METERS   Model length unit to meters (default: 0.3048)");
    eprintln!("  BDE_METERS_TO_DEGREES  Meters to decimal degrees (default: 0.000009)");
    eprintln!("  BDE_ALLOWED_TYPES      Exported fixture types, comma-separated");
    eprintln!("  BDE_LABEL_FAILURES     continue | abort");
    eprintln!("  BDE_ELEVATION_INDEX    zero | level");
    eprintln!("  RUST_LOG               Log filter (default: info)");
}
