//! Satellite cache that is wiped periodically.

use leocdn_core::{Request, SimTime, StepResult, Topology};

use super::{CacheStrategy, SatelliteStore, StoreReporting};
use crate::constellation::Constellation;

/// Satellite cache invalidated in full once `interval` seconds have passed.
///
/// The default interval is the time a satellite needs to move one slot along
/// its plane, after which it serves a different ground area.
#[derive(Debug)]
pub struct SatelliteTimeoutCache {
    constellation: Constellation,
    interval: SimTime,
    last_invalidated: SimTime,
    store: SatelliteStore,
}

impl SatelliteTimeoutCache {
    /// Creates an empty cache dropped every `interval` seconds.
    pub fn new(constellation: Constellation, interval: SimTime) -> Self {
        Self {
            constellation,
            interval,
            last_invalidated: 0,
            store: SatelliteStore::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &SatelliteStore {
        &self.store
    }

    fn invalidate_if_due(&mut self, time: SimTime) {
        if time - self.last_invalidated >= self.interval {
            tracing::debug!(
                "SATELLITE-TIMEOUT: invalidating {} cached pairs at t={time}",
                self.store.len()
            );
            self.store.clear();
            self.last_invalidated = time;
        }
    }
}

impl CacheStrategy for SatelliteTimeoutCache {
    fn name(&self) -> &str {
        "SATELLITE-TIMEOUT"
    }

    fn store_node_count(&self) -> usize {
        self.constellation.satellite_count()
    }

    fn store_reporting(&self) -> StoreReporting {
        StoreReporting::Snapshot
    }

    fn step(&mut self, time: SimTime, _topology: &Topology, requests: &[Request]) -> StepResult {
        self.invalidate_if_due(time);
        self.store.serve(requests)
    }
}
