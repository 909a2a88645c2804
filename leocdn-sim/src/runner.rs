//! Wires a configured run together: inputs, roster, aggregator and orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use leocdn_core::{OutputMode, RunConfig, load_workload};

use crate::SimError;
use crate::aggregator::{Aggregator, ArtifactWriter, StrategyProfile, spawn_aggregator};
use crate::orchestrator::Orchestrator;
use crate::strategy::build_roster;

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Name of the simulated workload
    pub workload: String,
    /// Steps every strategy finished
    pub steps_completed: usize,
    /// Write sets the aggregator turned into artifacts
    pub write_sets_processed: usize,
    /// Directory holding the artifacts
    pub output_dir: PathBuf,
    /// Format of the artifacts
    pub output_mode: OutputMode,
    /// Roster in reporting order
    pub strategies: Vec<StrategyProfile>,
}

/// Runs every step of the configured workload and writes its artifacts.
///
/// # Errors
///
/// - `SimError::Load` - Workload config or static tables cannot be loaded
/// - `SimError::Strategy` - The roster cannot be built from the configuration
/// - `SimError::Input` - A step's inputs are missing or malformed
/// - `SimError::Artifact` - Artifacts cannot be written
pub async fn run_workload(run: &RunConfig) -> Result<RunReport, SimError> {
    let loaded = load_workload(run).await?;
    let simulation = &run.simulation;

    tracing::info!(
        "Loaded workload '{}': {} steps of {} s, {} items, {} ground stations",
        run.name,
        loaded.workload.steps,
        loaded.workload.step_length,
        loaded.item_sizes.len(),
        loaded.populations.len()
    );

    let item_sizes = Arc::new(loaded.item_sizes);
    let roster = build_roster(simulation, Arc::clone(&item_sizes), &loaded.populations)?;
    let profiles: Vec<StrategyProfile> = roster.iter().map(StrategyProfile::of).collect();

    let output_dir = loaded.layout.cache_dir();
    let writer = ArtifactWriter::new(output_dir.clone(), simulation.output_mode);
    let aggregator = spawn_aggregator(
        Aggregator::new(profiles.clone(), item_sizes, writer),
        simulation.channel_capacity,
    );

    let report = match Orchestrator::new(loaded.steps, aggregator.sender())
        .run(roster, loaded.workload.step_times())
        .await
    {
        Ok(report) => report,
        // The aggregator's own failure is what closed the channel
        Err(SimError::AggregatorClosed) => {
            return Err(match aggregator.finish().await {
                Err(e) => e,
                Ok(_) => SimError::AggregatorClosed,
            });
        }
        Err(e) => return Err(e),
    };
    let aggregated = aggregator.finish().await?;

    Ok(RunReport {
        workload: run.name.clone(),
        steps_completed: report.steps_completed,
        write_sets_processed: aggregated.write_sets_processed,
        output_dir,
        output_mode: simulation.output_mode,
        strategies: profiles,
    })
}
