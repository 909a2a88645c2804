//! LEO CDN Core - data model, inputs and configuration
//!
//! This crate holds everything the caching simulation consumes: the request
//! and record types exchanged between strategies and the aggregator, readers
//! for the precomputed workload files, run configuration and tracing setup.

pub mod config;
pub mod input;
pub mod loader;
pub mod model;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ConfigError, OutputMode, RunConfig, SimulationConfig, WorkloadConfig, WorkloadLayout};
pub use input::{InputError, StepInputSource, WorkloadFiles};
pub use loader::{LoadedWorkload, load_workload};
pub use model::{
    CacheRecord, GstPopulationTable, HopsRecord, ItemId, ItemSizeTable, NodeId, Request, SimTime,
    StepInput, StepResult, StoreRecord, Topology, TxRecord, WriteSet,
};

/// Errors that can bubble up from loading a run.
#[derive(Debug, thiserror::Error)]
pub enum LeocdnError {
    /// A static table could not be read or parsed
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// The run or workload configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LeocdnError {
    /// Checks if the error stems from the user's configuration rather than the data.
    pub fn is_user_error(&self) -> bool {
        matches!(self, LeocdnError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, LeocdnError>;
