//! Loads everything a run needs before the first step.

use crate::config::{RunConfig, WorkloadConfig, WorkloadLayout};
use crate::input::{WorkloadFiles, read_gst_population, read_item_sizes};
use crate::model::{GstPopulationTable, ItemSizeTable};

/// Static inputs of a run plus the per-step source.
#[derive(Debug)]
pub struct LoadedWorkload {
    pub layout: WorkloadLayout,
    pub workload: WorkloadConfig,
    pub item_sizes: ItemSizeTable,
    pub populations: GstPopulationTable,
    pub steps: WorkloadFiles,
}

/// Reads the workload config and the static tables of a run.
///
/// # Errors
///
/// - `LeocdnError::Config` - Workload config is missing or invalid
/// - `LeocdnError::Input` - Item size or population table is missing or malformed
pub async fn load_workload(run: &RunConfig) -> crate::Result<LoadedWorkload> {
    let layout = run.layout();
    let workload = WorkloadConfig::load(&layout.config_file()).await?;

    let load_path = layout.workload_file(&workload.loadfile);
    let cities_path = layout.workload_file(&workload.cities);
    let (item_sizes, populations) = tokio::try_join!(
        read_item_sizes(&load_path),
        read_gst_population(&cities_path),
    )?;

    let steps = WorkloadFiles::new(layout.clone(), workload.requestamount);

    Ok(LoadedWorkload {
        layout,
        workload,
        item_sizes,
        populations,
        steps,
    })
}
