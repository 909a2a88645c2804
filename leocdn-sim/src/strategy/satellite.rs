//! Plain per-satellite cache.

use leocdn_core::{Request, SimTime, StepResult, Topology};

use super::{CacheStrategy, SatelliteStore, StoreReporting};
use crate::constellation::Constellation;

/// Caches every requested item on the first satellite of its path, forever.
#[derive(Debug)]
pub struct SatelliteCache {
    constellation: Constellation,
    store: SatelliteStore,
}

impl SatelliteCache {
    /// Creates an empty cache on every satellite of the constellation.
    pub fn new(constellation: Constellation) -> Self {
        Self {
            constellation,
            store: SatelliteStore::new(),
        }
    }
}

impl CacheStrategy for SatelliteCache {
    fn name(&self) -> &str {
        "SATELLITE"
    }

    fn store_node_count(&self) -> usize {
        self.constellation.satellite_count()
    }

    fn store_reporting(&self) -> StoreReporting {
        StoreReporting::Snapshot
    }

    fn step(&mut self, _time: SimTime, _topology: &Topology, requests: &[Request]) -> StepResult {
        self.store.serve(requests)
    }
}

#[cfg(test)]
mod tests {
    use leocdn_core::{CacheRecord, HopsRecord, StoreRecord, TxRecord};

    use super::*;

    fn cache() -> SatelliteCache {
        SatelliteCache::new(Constellation::new(66, 24))
    }

    #[test]
    fn test_fresh_cache_misses_then_stores() {
        let mut strategy = cache();
        let request = Request::new(1, 500, vec![10, 20, 30]).unwrap();

        let result = strategy.step(0, &Topology::default(), &[request]);

        assert_eq!(
            result.tx_records,
            vec![
                TxRecord {
                    source: 10,
                    target: 20,
                    bandwidth: 500
                },
                TxRecord {
                    source: 20,
                    target: 30,
                    bandwidth: 500
                },
            ]
        );
        assert_eq!(result.hops_records, vec![HopsRecord { item: 1, hops: 2 }]);
        assert_eq!(result.cache_records, vec![CacheRecord { item: 1, hit: false }]);
        assert_eq!(result.store_records, vec![StoreRecord { node: 20, item: 1 }]);
    }

    #[test]
    fn test_next_step_hits_on_first_satellite() {
        let mut strategy = cache();
        let request = Request::new(1, 500, vec![10, 20, 30]).unwrap();

        strategy.step(0, &Topology::default(), std::slice::from_ref(&request));
        let result = strategy.step(87, &Topology::default(), &[request]);

        assert_eq!(result.hit_count(), 1);
        assert_eq!(result.hops_records[0].hops, 1);
        assert_eq!(result.store_records.len(), 1);
    }

    #[test]
    fn test_only_first_satellite_is_checked() {
        let mut strategy = cache();
        strategy.step(
            0,
            &Topology::default(),
            &[Request::new(1, 500, vec![-1, 30, 40]).unwrap()],
        );

        // Item 1 sits on 30, but this path enters the constellation at 20
        let result = strategy.step(
            87,
            &Topology::default(),
            &[Request::new(1, 500, vec![-2, 20, 30, 40]).unwrap()],
        );

        assert_eq!(result.hit_count(), 0);
        assert_eq!(result.hops_records[0].hops, 3);
        assert_eq!(result.store_records.len(), 2);
    }
}
