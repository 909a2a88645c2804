//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use leocdn_core::{ItemSizeTable, OutputMode, RunConfig};
use leocdn_sim::{CacheStrategy, RunReport, StrategyProfile, build_roster, run_workload};
use serde::Serialize;

/// File written next to the artifacts describing the run that produced them.
const MANIFEST_FILE: &str = "run-manifest.json";

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate every step of a workload and write per-step artifacts
    Run {
        /// Run configuration file
        config: PathBuf,
        /// Override the configured artifact format
        #[arg(long, value_enum)]
        output_mode: Option<OutputMode>,
    },
    /// List the strategies a run configuration produces
    Strategies {
        /// Run configuration file
        config: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Any configuration, input or artifact error ends the run
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            config,
            output_mode,
        } => run(&config, output_mode).await,
        Commands::Strategies { config } => list_strategies(&config).await,
    }
}

#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    workload: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    steps_completed: usize,
    write_sets_processed: usize,
    output_mode: OutputMode,
    strategies: &'a [StrategyProfile],
}

async fn run(config_path: &Path, output_mode: Option<OutputMode>) -> anyhow::Result<()> {
    let mut run = RunConfig::load(config_path).await?;
    if let Some(mode) = output_mode {
        run.simulation.output_mode = mode;
    }

    let started_at = Utc::now();
    let report = run_workload(&run)
        .await
        .with_context(|| format!("Simulation of workload '{}' failed", run.name))?;
    let finished_at = Utc::now();

    write_manifest(&report, started_at, finished_at).await?;

    println!(
        "Simulated {} steps of '{}' with {} strategies",
        report.steps_completed,
        report.workload,
        report.strategies.len()
    );
    println!("  Artifacts: {}", report.output_dir.display());
    println!(
        "  Duration:  {:.1}s",
        (finished_at - started_at).num_milliseconds() as f64 / 1000.0
    );

    Ok(())
}

async fn write_manifest(
    report: &RunReport,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    let manifest = RunManifest {
        workload: &report.workload,
        started_at,
        finished_at,
        steps_completed: report.steps_completed,
        write_sets_processed: report.write_sets_processed,
        output_mode: report.output_mode,
        strategies: &report.strategies,
    };

    let path = report.output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!("Wrote run manifest to {}", path.display());
    Ok(())
}

async fn list_strategies(config_path: &Path) -> anyhow::Result<()> {
    let run = RunConfig::load(config_path).await?;
    let loaded = leocdn_core::load_workload(&run).await?;
    let roster = build_roster(
        &run.simulation,
        Arc::new(ItemSizeTable::new()),
        &loaded.populations,
    )?;

    println!("{:<24} {:>12}  REPORTING", "STRATEGY", "STORE NODES");
    for strategy in &roster {
        println!(
            "{:<24} {:>12}  {:?}",
            strategy.name(),
            strategy.store_node_count(),
            strategy.store_reporting()
        );
    }

    Ok(())
}
