//! Satellite cache that follows the ground it serves.
//!
//! Satellites drift along their plane, so content cached above a region is
//! handed backwards to the satellite taking over that region. Once an hour the
//! Earth has turned far enough that the neighboring plane takes over, and the
//! content moves across planes.

use std::sync::Arc;

use leocdn_core::{ItemSizeTable, Request, SimTime, StepResult, Topology, TxRecord};

use super::{CacheStrategy, SatelliteStore, StoreReporting};
use crate::constellation::Constellation;

/// Satellite cache with periodic intra-plane and cross-plane propagation.
#[derive(Debug)]
pub struct SatelliteVirtualCache {
    constellation: Constellation,
    item_sizes: Arc<ItemSizeTable>,
    intra_interval: SimTime,
    cross_interval: SimTime,
    last_intra: SimTime,
    last_cross: SimTime,
    store: SatelliteStore,
}

impl SatelliteVirtualCache {
    /// Creates an empty cache propagating along planes every `intra_interval`
    /// seconds and across planes every `cross_interval` seconds.
    pub fn new(
        constellation: Constellation,
        item_sizes: Arc<ItemSizeTable>,
        intra_interval: SimTime,
        cross_interval: SimTime,
    ) -> Self {
        Self {
            constellation,
            item_sizes,
            intra_interval,
            cross_interval,
            last_intra: 0,
            last_cross: 0,
            store: SatelliteStore::new(),
        }
    }

    /// Test hook: seeds the cache directly.
    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut SatelliteStore {
        &mut self.store
    }

    /// Runs the due propagation passes, intra-plane first, and returns their charges.
    fn propagate_if_due(&mut self, time: SimTime) -> Vec<TxRecord> {
        let constellation = self.constellation;
        let mut tx_records = Vec::new();

        if time - self.last_intra >= self.intra_interval {
            let charges = self
                .store
                .propagate(|sat| constellation.backward_neighbor(sat), &self.item_sizes);
            tracing::debug!(
                "SATELLITE-VIRTUAL: intra-plane pass at t={time} moved {} items",
                charges.len()
            );
            tx_records.extend(charges);
            self.last_intra = time;
        }

        if time - self.last_cross >= self.cross_interval {
            let charges = self
                .store
                .propagate(|sat| constellation.cross_plane_neighbor(sat), &self.item_sizes);
            tracing::debug!(
                "SATELLITE-VIRTUAL: cross-plane pass at t={time} moved {} items",
                charges.len()
            );
            tx_records.extend(charges);
            self.last_cross = time;
        }

        tx_records
    }
}

impl CacheStrategy for SatelliteVirtualCache {
    fn name(&self) -> &str {
        "SATELLITE-VIRTUAL"
    }

    fn store_node_count(&self) -> usize {
        self.constellation.satellite_count()
    }

    fn store_reporting(&self) -> StoreReporting {
        StoreReporting::Snapshot
    }

    fn step(&mut self, time: SimTime, _topology: &Topology, requests: &[Request]) -> StepResult {
        let propagation = self.propagate_if_due(time);
        let mut result = self.store.serve(requests);

        if !propagation.is_empty() {
            let mut tx_records = propagation;
            tx_records.append(&mut result.tx_records);
            result.tx_records = tx_records;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use leocdn_core::StoreRecord;

    use super::*;

    fn sizes() -> Arc<ItemSizeTable> {
        Arc::new([(1, 100), (2, 250)].into_iter().collect())
    }

    fn cache() -> SatelliteVirtualCache {
        SatelliteVirtualCache::new(Constellation::new(66, 24), sizes(), 87, 3600)
    }

    #[test]
    fn test_no_propagation_before_interval() {
        let mut strategy = cache();
        strategy.store_mut().insert(70, 1);

        let result = strategy.step(60, &Topology::default(), &[]);

        assert!(result.tx_records.is_empty());
        assert_eq!(result.store_records, vec![StoreRecord { node: 70, item: 1 }]);
    }

    #[test]
    fn test_intra_plane_pass_moves_items_backwards() {
        let mut strategy = cache();
        strategy.store_mut().insert(70, 1);

        let result = strategy.step(87, &Topology::default(), &[]);

        assert_eq!(
            result.tx_records,
            vec![TxRecord {
                source: 69,
                target: 70,
                bandwidth: 100
            }]
        );
        assert_eq!(result.store_records, vec![StoreRecord { node: 69, item: 1 }]);
    }

    #[test]
    fn test_requests_see_propagated_state() {
        let mut strategy = cache();
        strategy.store_mut().insert(70, 1);
        let request = Request::new(1, 100, vec![-1, 69, 3]).unwrap();

        let result = strategy.step(87, &Topology::default(), &[request]);

        assert_eq!(result.hit_count(), 1);
        assert_eq!(result.tx_records.len(), 2);
        assert_eq!(
            result.tx_records[1],
            TxRecord {
                source: -1,
                target: 69,
                bandwidth: 100
            }
        );
    }

    #[test]
    fn test_cross_plane_pass_runs_after_intra_plane_pass() {
        let mut strategy = cache();
        strategy.store_mut().insert(70, 2);

        // Both passes are due at t=3654 (= 42 * 87)
        let result = strategy.step(3654, &Topology::default(), &[]);

        // 70 -> 69 within plane 1, then 69 -> 135 in plane 2
        assert_eq!(result.store_records, vec![StoreRecord { node: 135, item: 2 }]);
        assert_eq!(
            result.tx_records,
            vec![
                TxRecord {
                    source: 69,
                    target: 70,
                    bandwidth: 250
                },
                TxRecord {
                    source: 69,
                    target: 135,
                    bandwidth: 250
                },
            ]
        );
    }

    #[test]
    fn test_item_already_at_neighbor_is_not_charged() {
        let mut strategy = cache();
        strategy.store_mut().insert(70, 1);
        strategy.store_mut().insert(69, 1);

        let result = strategy.step(87, &Topology::default(), &[]);

        // 69 receives item 1 from 70 for free; 68 receives it from 69 at cost
        assert_eq!(
            result.tx_records,
            vec![TxRecord {
                source: 68,
                target: 69,
                bandwidth: 100
            }]
        );
        assert_eq!(
            result.store_records,
            vec![
                StoreRecord { node: 68, item: 1 },
                StoreRecord { node: 69, item: 1 },
            ]
        );
    }
}
