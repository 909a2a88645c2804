//! Data model shared by input collaborators, strategies and the aggregator.

mod records;
mod request;
mod tables;
mod topology;

pub use records::{CacheRecord, HopsRecord, StepResult, StoreRecord, TxRecord, WriteSet};
pub use request::Request;
pub use tables::{GstPopulationTable, ItemSizeTable};
pub use topology::{GndSatLink, SatPath, StepInput, Topology};

/// Identifier of a network node: satellites are non-negative, ground stations
/// (and their synthetic replicas) are negative.
pub type NodeId = i64;

/// Identifier of a content item.
pub type ItemId = i64;

/// Simulation time in seconds since the start of the run.
pub type SimTime = i64;

/// Returns true when the node is a ground-side endpoint rather than a satellite.
pub fn is_ground_node(node: NodeId) -> bool {
    node < 0
}
