//! Replica caches located at the ground stations.

use std::collections::{BTreeSet, HashMap};

use leocdn_core::{
    CacheRecord, GstPopulationTable, ItemId, NodeId, Request, SimTime, StepResult, StoreRecord,
    Topology,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{CacheStrategy, StoreReporting, StrategyError, charge_full_path, hops_record};

/// Replicas serving one ground station; replica `k` has id `gst - k * offset`.
#[derive(Debug)]
struct StationReplicas {
    caches: Vec<BTreeSet<ItemId>>,
}

/// Load-balanced replica caches in front of each ground station.
///
/// Every ground station runs `ceil(population / capacity)` replicas (at least
/// one). Each request is routed to a uniformly chosen replica of its origin,
/// using a generator seeded at construction so runs are reproducible no matter
/// how strategies are scheduled. Replicas never evict, so store records only
/// report pairs inserted during the step.
#[derive(Debug)]
pub struct GroundStationCache {
    name: String,
    offset: i64,
    stations: HashMap<NodeId, StationReplicas>,
    store_nodes: usize,
    rng: ChaCha8Rng,
}

impl GroundStationCache {
    /// Creates the replicas of every ground station in the population table.
    ///
    /// # Errors
    ///
    /// - `StrategyError::ZeroCapacity` - `capacity` is zero
    /// - `StrategyError::ReplicaOffsetTooSmall` - A station needs `offset` or more replicas
    /// - `StrategyError::ReplicaIdUndecodable` - A replica id does not map back to its station
    pub fn new(
        capacity: u64,
        populations: &GstPopulationTable,
        offset: i64,
        seed: u64,
    ) -> Result<Self, StrategyError> {
        if capacity == 0 {
            return Err(StrategyError::ZeroCapacity);
        }

        let mut stations = HashMap::with_capacity(populations.len());
        let mut store_nodes = 0usize;

        for (gst, population) in populations.iter() {
            let replicas = population.div_ceil(capacity).max(1);

            if replicas >= offset as u64 {
                return Err(StrategyError::ReplicaOffsetTooSmall {
                    gst,
                    replicas,
                    offset,
                });
            }

            for k in 0..replicas as i64 {
                let replica = replica_id(gst, k, offset);
                if replica % offset != gst {
                    return Err(StrategyError::ReplicaIdUndecodable {
                        gst,
                        replica,
                        offset,
                    });
                }
            }

            stations.insert(
                gst,
                StationReplicas {
                    caches: vec![BTreeSet::new(); replicas as usize],
                },
            );
            store_nodes += replicas as usize;
        }

        Ok(Self {
            name: format!("GROUND-STATION-{capacity}"),
            offset,
            stations,
            store_nodes,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Replica ids serving a ground station, in replica order.
    #[cfg(test)]
    pub(crate) fn replica_ids(&self, gst: NodeId) -> Vec<NodeId> {
        self.stations
            .get(&gst)
            .map(|station| {
                (0..station.caches.len() as i64)
                    .map(|k| replica_id(gst, k, self.offset))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true when a replica of the ground station holds the item.
    #[cfg(test)]
    pub(crate) fn replica_holds(&self, replica: NodeId, item: ItemId) -> bool {
        let gst = replica % self.offset;
        let k = (gst - replica) / self.offset;
        self.stations
            .get(&gst)
            .and_then(|station| station.caches.get(k as usize))
            .is_some_and(|cache| cache.contains(&item))
    }

    /// Chooses the replica index serving a request from `gst`.
    fn pick_replica(&mut self, gst: NodeId) -> Option<usize> {
        let replicas = self.stations.get(&gst)?.caches.len();
        Some(self.rng.random_range(0..replicas))
    }
}

/// Synthetic id of replica `k` of a ground station.
pub(crate) fn replica_id(gst: NodeId, k: i64, offset: i64) -> NodeId {
    gst - k * offset
}

impl CacheStrategy for GroundStationCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn store_node_count(&self) -> usize {
        self.store_nodes
    }

    fn store_reporting(&self) -> StoreReporting {
        StoreReporting::Incremental
    }

    fn step(&mut self, _time: SimTime, _topology: &Topology, requests: &[Request]) -> StepResult {
        let mut result = StepResult::with_request_capacity(requests.len());
        let mut inserted: BTreeSet<(NodeId, usize, ItemId)> = BTreeSet::new();
        let mut unknown_origins = 0usize;

        for request in requests {
            let gst = request.origin();
            let replica = self.pick_replica(gst);

            let hit = replica.is_some_and(|k| self.stations[&gst].caches[k].contains(&request.item()));

            let hops = if hit {
                0
            } else {
                charge_full_path(request, &mut result.tx_records)
            };

            result.cache_records.push(CacheRecord {
                item: request.item(),
                hit,
            });
            result.hops_records.push(hops_record(request, hops));

            match replica {
                Some(k) if !hit => {
                    inserted.insert((gst, k, request.item()));
                }
                Some(_) => {}
                None => unknown_origins += 1,
            }
        }

        if unknown_origins > 0 {
            tracing::debug!(
                "{}: {unknown_origins} requests from ground stations without replicas",
                self.name
            );
        }

        for (gst, k, item) in inserted {
            let Some(station) = self.stations.get_mut(&gst) else {
                continue;
            };
            if station.caches[k].insert(item) {
                result.store_records.push(StoreRecord {
                    node: replica_id(gst, k as i64, self.offset),
                    item,
                });
            }
        }

        result
    }
}
