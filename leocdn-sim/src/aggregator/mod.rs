//! Metrics aggregator actor.
//!
//! A single task receives tagged write sets from every strategy, turns them
//! into metrics and writes one artifact set per (time, strategy). Arrival
//! order across strategies is irrelevant because each artifact is named by
//! its own time and strategy.

mod artifacts;
pub mod metrics;
pub mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use leocdn_core::{ItemSizeTable, NodeId, OutputMode, WriteSet};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use artifacts::ArtifactWriter;
use metrics::StepMetrics;
pub use stats::{Summary, percentile};

use crate::SimError;
use crate::strategy::{CacheStrategy, StoreReporting};

/// Messages consumed by the aggregator.
#[derive(Debug)]
pub enum AggregatorMessage {
    /// Results of one strategy for one step
    Write(WriteSet),
    /// No more write sets follow
    Shutdown,
}

/// What the aggregator needs to know about a strategy up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyProfile {
    /// Strategy name used in artifact file names
    pub name: String,
    /// Nodes able to store items
    pub store_nodes: usize,
    /// Whether store records are snapshots or increments
    pub reporting: StoreReporting,
}

impl StrategyProfile {
    /// Captures a strategy's name and store contract.
    pub fn of<S: CacheStrategy + ?Sized>(strategy: &S) -> Self {
        Self {
            name: strategy.name().to_string(),
            store_nodes: strategy.store_node_count(),
            reporting: strategy.store_reporting(),
        }
    }
}

/// Returned when the aggregator has drained its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorReport {
    /// Write sets turned into artifacts
    pub write_sets_processed: usize,
}

/// Sequential consumer turning write sets into artifacts.
#[derive(Debug)]
pub struct Aggregator {
    profiles: HashMap<String, StrategyProfile>,
    item_sizes: Arc<ItemSizeTable>,
    writer: ArtifactWriter,
    /// Cumulative bytes per node for strategies reporting increments
    stored: HashMap<String, HashMap<NodeId, u64>>,
    processed: usize,
}

impl Aggregator {
    /// Creates an aggregator expecting write sets from the given strategies.
    pub fn new(
        profiles: impl IntoIterator<Item = StrategyProfile>,
        item_sizes: Arc<ItemSizeTable>,
        writer: ArtifactWriter,
    ) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.name.clone(), profile))
                .collect(),
            item_sizes,
            writer,
            stored: HashMap::new(),
            processed: 0,
        }
    }

    /// Computes the metrics of a write set, updating running storage totals.
    ///
    /// # Errors
    ///
    /// - `SimError::UnknownStrategy` - No profile was registered for the write set's strategy
    pub fn metrics(&mut self, write_set: &WriteSet) -> Result<StepMetrics, SimError> {
        let profile =
            self.profiles
                .get(&write_set.strategy)
                .ok_or_else(|| SimError::UnknownStrategy {
                    name: write_set.strategy.clone(),
                })?;
        let result = &write_set.result;

        let storage = match profile.reporting {
            StoreReporting::Incremental => {
                let per_node = self.stored.entry(profile.name.clone()).or_default();
                metrics::accumulate_storage(&result.store_records, &self.item_sizes, per_node);
                metrics::storage(per_node, profile.store_nodes)
            }
            StoreReporting::Snapshot => {
                let mut per_node = HashMap::new();
                metrics::accumulate_storage(&result.store_records, &self.item_sizes, &mut per_node);
                metrics::storage(&per_node, profile.store_nodes)
            }
        };

        Ok(StepMetrics {
            bandwidth: metrics::bandwidth(&result.tx_records),
            storage,
            cache: metrics::cache(&result.cache_records),
            hops: metrics::hops(&result.hops_records),
        })
    }

    /// Writes the artifacts of one write set.
    ///
    /// # Errors
    ///
    /// - `SimError::UnknownStrategy` - Write set from an unregistered strategy
    /// - `SimError::Artifact` - An artifact cannot be written
    pub async fn handle(&mut self, write_set: WriteSet) -> Result<(), SimError> {
        tracing::trace!(
            "Aggregating t={} {} ({} requests)",
            write_set.time,
            write_set.strategy,
            write_set.result.cache_records.len()
        );

        match self.writer.mode() {
            OutputMode::Summary => {
                let metrics = self.metrics(&write_set)?;
                self.writer
                    .write_summary(write_set.time, &write_set.strategy, &metrics)
                    .await?;
            }
            OutputMode::Raw => {
                if !self.profiles.contains_key(&write_set.strategy) {
                    return Err(SimError::UnknownStrategy {
                        name: write_set.strategy,
                    });
                }
                self.writer
                    .write_raw(write_set.time, &write_set.strategy, &write_set.result)
                    .await?;
            }
        }

        self.processed += 1;
        Ok(())
    }

    /// Consumes messages until shutdown.
    ///
    /// # Errors
    ///
    /// - `SimError::AggregatorDisconnected` - Every sender dropped before shutdown
    /// - `SimError::Artifact` - Output directory or an artifact cannot be written
    /// - `SimError::UnknownStrategy` - Write set from an unregistered strategy
    pub async fn run(
        mut self,
        mut receiver: mpsc::Receiver<AggregatorMessage>,
    ) -> Result<AggregatorReport, SimError> {
        self.writer.prepare().await?;
        tracing::debug!("Aggregator started, writing to {}", self.writer.dir().display());

        while let Some(message) = receiver.recv().await {
            match message {
                AggregatorMessage::Write(write_set) => self.handle(write_set).await?,
                AggregatorMessage::Shutdown => {
                    tracing::info!("Aggregator processed {} write sets", self.processed);
                    return Ok(AggregatorReport {
                        write_sets_processed: self.processed,
                    });
                }
            }
        }

        Err(SimError::AggregatorDisconnected)
    }
}

/// Handle to a running aggregator task.
#[derive(Debug)]
pub struct AggregatorHandle {
    sender: mpsc::Sender<AggregatorMessage>,
    task: JoinHandle<Result<AggregatorReport, SimError>>,
}

impl AggregatorHandle {
    /// Sender for strategy tasks; the channel is bounded, so producers wait when it is full.
    pub fn sender(&self) -> mpsc::Sender<AggregatorMessage> {
        self.sender.clone()
    }

    /// Waits for the aggregator to finish.
    ///
    /// # Errors
    ///
    /// - `SimError::TaskFailed` - Aggregator task panicked
    /// - Any error the aggregator itself returned
    pub async fn finish(self) -> Result<AggregatorReport, SimError> {
        drop(self.sender);
        self.task.await.map_err(|e| SimError::TaskFailed {
            reason: format!("aggregator: {e}"),
        })?
    }
}

/// Spawns the aggregator on the runtime with a bounded inbound queue.
pub fn spawn_aggregator(aggregator: Aggregator, channel_capacity: usize) -> AggregatorHandle {
    let (sender, receiver) = mpsc::channel(channel_capacity.max(1));
    let task = tokio::spawn(aggregator.run(receiver));
    AggregatorHandle { sender, task }
}

#[cfg(test)]
mod tests {
    use leocdn_core::{CacheRecord, HopsRecord, StepResult, StoreRecord, TxRecord};
    use tempfile::TempDir;

    use super::*;

    fn profiles() -> Vec<StrategyProfile> {
        vec![
            StrategyProfile {
                name: "GROUND-STATION-100".to_string(),
                store_nodes: 2,
                reporting: StoreReporting::Incremental,
            },
            StrategyProfile {
                name: "SATELLITE".to_string(),
                store_nodes: 4,
                reporting: StoreReporting::Snapshot,
            },
        ]
    }

    fn sizes() -> Arc<ItemSizeTable> {
        Arc::new([(1, 100), (2, 50)].into_iter().collect())
    }

    fn write_set(time: i64, strategy: &str, store_records: Vec<StoreRecord>) -> WriteSet {
        WriteSet {
            time,
            strategy: strategy.to_string(),
            result: StepResult {
                tx_records: vec![TxRecord {
                    source: -1,
                    target: 20,
                    bandwidth: 100,
                }],
                store_records,
                cache_records: vec![CacheRecord { item: 1, hit: false }],
                hops_records: vec![HopsRecord { item: 1, hops: 1 }],
            },
        }
    }

    fn aggregator(dir: &TempDir, mode: OutputMode) -> Aggregator {
        Aggregator::new(
            profiles(),
            sizes(),
            ArtifactWriter::new(dir.path().to_path_buf(), mode),
        )
    }

    #[test]
    fn test_incremental_storage_accumulates_across_steps() {
        let dir = TempDir::new().unwrap();
        let mut aggregator = aggregator(&dir, OutputMode::Summary);

        let first = aggregator
            .metrics(&write_set(0, "GROUND-STATION-100", vec![StoreRecord { node: -1, item: 1 }]))
            .unwrap();
        assert_eq!(first.storage.summary.total, 100);
        assert_eq!(first.storage.no_store_nodes, 1);

        let second = aggregator
            .metrics(&write_set(87, "GROUND-STATION-100", vec![StoreRecord { node: -2, item: 2 }]))
            .unwrap();
        assert_eq!(second.storage.summary.total, 150);
        assert_eq!(second.storage.no_store_nodes, 0);
    }

    #[test]
    fn test_snapshot_storage_starts_fresh_each_step() {
        let dir = TempDir::new().unwrap();
        let mut aggregator = aggregator(&dir, OutputMode::Summary);

        aggregator
            .metrics(&write_set(0, "SATELLITE", vec![StoreRecord { node: 20, item: 1 }]))
            .unwrap();
        let second = aggregator
            .metrics(&write_set(87, "SATELLITE", vec![StoreRecord { node: 20, item: 2 }]))
            .unwrap();

        assert_eq!(second.storage.summary.total, 50);
        assert_eq!(second.storage.no_store_nodes, 3);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut aggregator = aggregator(&dir, OutputMode::Summary);

        let err = aggregator.metrics(&write_set(0, "MYSTERY", Vec::new())).unwrap_err();
        assert!(matches!(err, SimError::UnknownStrategy { name } if name == "MYSTERY"));
    }

    #[tokio::test]
    async fn test_spawned_aggregator_writes_until_shutdown() {
        let dir = TempDir::new().unwrap();
        let handle = spawn_aggregator(aggregator(&dir, OutputMode::Summary), 4);
        let sender = handle.sender();

        sender
            .send(AggregatorMessage::Write(write_set(
                0,
                "SATELLITE",
                vec![StoreRecord { node: 20, item: 1 }],
            )))
            .await
            .unwrap();
        sender.send(AggregatorMessage::Shutdown).await.unwrap();

        let report = handle.finish().await.unwrap();
        assert_eq!(report.write_sets_processed, 1);

        let cache = std::fs::read_to_string(dir.path().join("c.csv0SATELLITEcache")).unwrap();
        assert_eq!(cache, "ratio,0\nnum_requests,1\n");
        let store = std::fs::read_to_string(dir.path().join("c.csv0SATELLITEstore")).unwrap();
        assert!(store.starts_with("total,100\nmax,100\nmin,0\navg,25\n"));
        assert!(store.ends_with("numnodes,4\nnumnostorenodes,3\n"));
    }

    #[tokio::test]
    async fn test_closed_channel_without_shutdown_is_an_error() {
        let dir = TempDir::new().unwrap();
        let handle = spawn_aggregator(aggregator(&dir, OutputMode::Raw), 4);

        let err = handle.finish().await.unwrap_err();
        assert!(matches!(err, SimError::AggregatorDisconnected));
    }

    #[tokio::test]
    async fn test_raw_mode_writes_records() {
        let dir = TempDir::new().unwrap();
        let mut aggregator = aggregator(&dir, OutputMode::Raw);

        aggregator
            .handle(write_set(87, "SATELLITE", vec![StoreRecord { node: 20, item: 1 }]))
            .await
            .unwrap();

        let store = std::fs::read_to_string(dir.path().join("c.csv87SATELLITEstore")).unwrap();
        assert_eq!(store, "node,item\n20,1\n");
        let hops = std::fs::read_to_string(dir.path().join("c.csv87SATELLITEhops")).unwrap();
        assert_eq!(hops, "item,hops\n1,1\n");
    }
}
