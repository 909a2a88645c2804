//! Cache strategies compared by the simulation.
//!
//! The set of strategies is closed: [`Strategy`] enumerates every variant and
//! dispatches to the shared [`CacheStrategy`] contract. Each instance owns its
//! cache state exclusively; the orchestrator moves it into a worker for one
//! step at a time, so `step` never runs concurrently for the same instance.
//!
//! Every strategy evaluates hits against the cache as it was when the step
//! began. Items inserted while serving a step become visible from the next
//! step on, so the order of requests within a step never changes an outcome.

mod ground_station;
mod none;
mod satellite;
mod store;
mod timeout;
mod virtual_propagation;

use std::sync::Arc;

use leocdn_core::{
    GstPopulationTable, HopsRecord, ItemSizeTable, NodeId, Request, SimTime, SimulationConfig,
    StepResult, Topology, TxRecord,
};
use serde::Serialize;

pub use ground_station::GroundStationCache;
pub use none::NoCache;
pub use satellite::SatelliteCache;
pub use store::SatelliteStore;
pub use timeout::SatelliteTimeoutCache;
pub use virtual_propagation::SatelliteVirtualCache;

use crate::constellation::Constellation;

/// How a strategy reports its store records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreReporting {
    /// Full content of every cache after the step
    Snapshot,
    /// Only pairs inserted during the step; the cache never evicts
    Incremental,
}

/// Errors raised while constructing strategies.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Station `gst` needs at least `offset` replicas
    #[error(
        "Replica id offset {offset} too small: ground station {gst} needs {replicas} replicas"
    )]
    ReplicaOffsetTooSmall {
        /// Ground station
        gst: NodeId,
        /// Replicas the station needs
        replicas: u64,
        /// Configured replica id offset
        offset: i64,
    },

    /// A replica id does not map back to its station
    #[error("Replica id {replica} of ground station {gst} does not decode with offset {offset}")]
    ReplicaIdUndecodable {
        /// Ground station
        gst: NodeId,
        /// Replica id that decodes to another station
        replica: NodeId,
        /// Configured replica id offset
        offset: i64,
    },

    /// A configured capacity is zero
    #[error("Ground station capacity must be positive")]
    ZeroCapacity,
}

/// Capability shared by every cache strategy.
pub trait CacheStrategy: Send {
    /// Name used to tag results and artifacts.
    fn name(&self) -> &str;

    /// Number of nodes that can hold cached items.
    fn store_node_count(&self) -> usize;

    /// Whether store records are snapshots or increments.
    fn store_reporting(&self) -> StoreReporting;

    /// Serves one step's requests and advances the cache state.
    ///
    /// Must be called with strictly increasing `time` values.
    fn step(&mut self, time: SimTime, topology: &Topology, requests: &[Request]) -> StepResult;
}

/// Every strategy variant the simulation knows.
#[derive(Debug)]
pub enum Strategy {
    /// Baseline without any cache
    None(NoCache),
    /// Replicas next to ground stations, one roster entry per capacity
    GroundStation(GroundStationCache),
    /// Cache on the first satellite of each request path
    Satellite(SatelliteCache),
    /// Satellite cache dropped at a fixed interval
    SatelliteTimeout(SatelliteTimeoutCache),
    /// Satellite cache handed over as the constellation moves
    SatelliteVirtual(SatelliteVirtualCache),
}

impl CacheStrategy for Strategy {
    fn name(&self) -> &str {
        match self {
            Strategy::None(s) => s.name(),
            Strategy::GroundStation(s) => s.name(),
            Strategy::Satellite(s) => s.name(),
            Strategy::SatelliteTimeout(s) => s.name(),
            Strategy::SatelliteVirtual(s) => s.name(),
        }
    }

    fn store_node_count(&self) -> usize {
        match self {
            Strategy::None(s) => s.store_node_count(),
            Strategy::GroundStation(s) => s.store_node_count(),
            Strategy::Satellite(s) => s.store_node_count(),
            Strategy::SatelliteTimeout(s) => s.store_node_count(),
            Strategy::SatelliteVirtual(s) => s.store_node_count(),
        }
    }

    fn store_reporting(&self) -> StoreReporting {
        match self {
            Strategy::None(s) => s.store_reporting(),
            Strategy::GroundStation(s) => s.store_reporting(),
            Strategy::Satellite(s) => s.store_reporting(),
            Strategy::SatelliteTimeout(s) => s.store_reporting(),
            Strategy::SatelliteVirtual(s) => s.store_reporting(),
        }
    }

    fn step(&mut self, time: SimTime, topology: &Topology, requests: &[Request]) -> StepResult {
        match self {
            Strategy::None(s) => s.step(time, topology, requests),
            Strategy::GroundStation(s) => s.step(time, topology, requests),
            Strategy::Satellite(s) => s.step(time, topology, requests),
            Strategy::SatelliteTimeout(s) => s.step(time, topology, requests),
            Strategy::SatelliteVirtual(s) => s.step(time, topology, requests),
        }
    }
}

/// Builds the default strategy roster in reporting order:
/// none, one ground-station cache per capacity, satellite, timeout, virtual.
///
/// # Errors
///
/// - `StrategyError` - A ground-station cache cannot assign decodable replica ids
pub fn build_roster(
    config: &SimulationConfig,
    item_sizes: Arc<ItemSizeTable>,
    populations: &GstPopulationTable,
) -> Result<Vec<Strategy>, StrategyError> {
    let constellation = Constellation::from_config(config);
    let mut roster = vec![Strategy::None(NoCache::new())];

    for &capacity in &config.ground_station_capacities {
        let cache = GroundStationCache::new(
            capacity,
            populations,
            config.replica_id_offset,
            config.rng_seed,
        )?;
        roster.push(Strategy::GroundStation(cache));
    }

    roster.push(Strategy::Satellite(SatelliteCache::new(constellation)));
    roster.push(Strategy::SatelliteTimeout(SatelliteTimeoutCache::new(
        constellation,
        config.timeout_interval,
    )));
    roster.push(Strategy::SatelliteVirtual(SatelliteVirtualCache::new(
        constellation,
        item_sizes,
        config.intra_plane_interval,
        config.cross_plane_interval,
    )));

    tracing::debug!(
        "Built roster: {:?}",
        roster.iter().map(|s| s.name()).collect::<Vec<_>>()
    );

    Ok(roster)
}

/// Charges the request's bandwidth on every edge of its full path.
fn charge_full_path(request: &Request, tx_records: &mut Vec<TxRecord>) -> u64 {
    tx_records.extend(request.edges().map(|(source, target)| TxRecord {
        source,
        target,
        bandwidth: request.bandwidth(),
    }));
    request.full_path_hops()
}

fn hops_record(request: &Request, hops: u64) -> HopsRecord {
    HopsRecord {
        item: request.item(),
        hops,
    }
}
