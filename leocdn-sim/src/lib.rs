//! LEO CDN Simulation - caching strategies, step orchestration and metrics

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Compares where content should be cached in a LEO satellite network: not at
//! all, at ground-station replicas, on the first satellite of each request
//! path, on satellites that periodically drop their cache, or on satellites
//! that hand their cache over as the constellation moves.
//!
//! # Architecture
//!
//! - **Strategies**: one persistent cache state per strategy instance, advanced
//!   one step at a time
//! - **Orchestrator**: fans each step out to every strategy and waits for all
//!   of them before the next step begins
//! - **Aggregator**: single consumer turning tagged step results into
//!   per-step artifacts

pub mod aggregator;
pub mod constellation;
pub mod orchestrator;
pub mod runner;
pub mod strategy;

use std::path::PathBuf;

pub use aggregator::{
    Aggregator, AggregatorHandle, AggregatorMessage, AggregatorReport, ArtifactWriter,
    StrategyProfile, spawn_aggregator,
};
pub use constellation::Constellation;
pub use orchestrator::{Orchestrator, OrchestratorReport};
pub use runner::{RunReport, run_workload};
pub use strategy::{CacheStrategy, StoreReporting, Strategy, StrategyError, build_roster};

/// Errors raised while running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Workload configuration or static tables could not be loaded
    #[error("Failed to load workload: {0}")]
    Load(#[from] leocdn_core::LeocdnError),

    /// A step's inputs are missing or malformed
    #[error("Input error: {0}")]
    Input(#[from] leocdn_core::InputError),

    /// The roster could not be built
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    /// A strategy worker panicked or was cancelled
    #[error("Task failed: {reason}")]
    TaskFailed {
        /// Join error of the worker
        reason: String,
    },

    /// The aggregator dropped its receiver before the run ended
    #[error("Aggregator stopped accepting results")]
    AggregatorClosed,

    /// Every sender was dropped without a shutdown message
    #[error("Aggregator inbound channel closed before shutdown")]
    AggregatorDisconnected,

    /// A write set named a strategy the aggregator was not told about
    #[error("Write set from unregistered strategy '{name}'")]
    UnknownStrategy {
        /// Strategy name carried by the write set
        name: String,
    },

    /// An artifact or the output directory could not be written
    #[error("Failed to write artifact {path}: {source}")]
    Artifact {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
