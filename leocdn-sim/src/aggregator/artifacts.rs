//! Artifact files written per step and strategy.
//!
//! Summary artifacts are `key,value` tables with fixed keys; raw artifacts
//! list every record with a header row. File names follow
//! `c.csv<time><strategy><kind>` inside the output directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use leocdn_core::config::artifact_path;
use leocdn_core::{OutputMode, SimTime, StepResult};

use super::metrics::StepMetrics;
use super::stats::Summary;
use crate::SimError;

/// Artifact kinds, used as file name suffix.
const TX: &str = "tx";
const STORE: &str = "store";
const CACHE: &str = "cache";
const HOPS: &str = "hops";

/// Writes artifacts below one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    mode: OutputMode,
}

impl ArtifactWriter {
    /// Creates a writer for `dir`; nothing touches the disk until [`Self::prepare`].
    pub fn new(dir: PathBuf, mode: OutputMode) -> Self {
        Self { dir, mode }
    }

    /// Format of the written artifacts.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory.
    ///
    /// # Errors
    ///
    /// - `SimError::Artifact` - Directory cannot be created
    pub async fn prepare(&self) -> Result<(), SimError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SimError::Artifact {
                path: self.dir.clone(),
                source,
            })
    }

    /// Writes the four summary artifacts.
    ///
    /// # Errors
    ///
    /// - `SimError::Artifact` - Any file cannot be written
    pub async fn write_summary(
        &self,
        time: SimTime,
        strategy: &str,
        metrics: &StepMetrics,
    ) -> Result<(), SimError> {
        let mut store = summary_table(&metrics.storage.summary);
        store.push_str(&format!(
            "numnodes,{}\nnumnostorenodes,{}\n",
            metrics.storage.num_nodes, metrics.storage.no_store_nodes
        ));

        let cache = format!(
            "ratio,{}\nnum_requests,{}\n",
            metrics.cache.ratio, metrics.cache.num_requests
        );

        self.write(time, strategy, TX, summary_table(&metrics.bandwidth)).await?;
        self.write(time, strategy, STORE, store).await?;
        self.write(time, strategy, CACHE, cache).await?;
        self.write(time, strategy, HOPS, summary_table(&metrics.hops)).await
    }

    /// Writes every raw record of a step.
    ///
    /// # Errors
    ///
    /// - `SimError::Artifact` - Any file cannot be written
    pub async fn write_raw(
        &self,
        time: SimTime,
        strategy: &str,
        result: &StepResult,
    ) -> Result<(), SimError> {
        let mut tx = String::from("source,target,bandwidth\n");
        for record in &result.tx_records {
            let (source, target) =
                crate::constellation::normalized_edge(record.source, record.target);
            let _ = writeln!(tx, "{source},{target},{}", record.bandwidth);
        }

        let mut store = String::from("node,item\n");
        for record in &result.store_records {
            let _ = writeln!(store, "{},{}", record.node, record.item);
        }

        let mut cache = String::from("item,success\n");
        for record in &result.cache_records {
            let _ = writeln!(cache, "{},{}", record.item, record.hit);
        }

        let mut hops = String::from("item,hops\n");
        for record in &result.hops_records {
            let _ = writeln!(hops, "{},{}", record.item, record.hops);
        }

        self.write(time, strategy, TX, tx).await?;
        self.write(time, strategy, STORE, store).await?;
        self.write(time, strategy, CACHE, cache).await?;
        self.write(time, strategy, HOPS, hops).await
    }

    async fn write(
        &self,
        time: SimTime,
        strategy: &str,
        kind: &str,
        content: String,
    ) -> Result<(), SimError> {
        let path = artifact_path(&self.dir, time, strategy, kind);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| SimError::Artifact { path, source })
    }
}

/// Renders the seven distribution keys shared by tx, store and hops artifacts.
fn summary_table(summary: &Summary) -> String {
    format!(
        "total,{}\nmax,{}\nmin,{}\navg,{}\nmedian,{}\n95th,{}\n99th,{}\n",
        summary.total,
        summary.max,
        summary.min,
        summary.avg,
        summary.median,
        summary.p95,
        summary.p99
    )
}
