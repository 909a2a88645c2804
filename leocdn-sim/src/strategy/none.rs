//! Baseline without any caching.

use leocdn_core::{CacheRecord, Request, SimTime, StepResult, Topology};

use super::{CacheStrategy, StoreReporting, charge_full_path, hops_record};

/// Serves every request from the origin.
#[derive(Debug, Default)]
pub struct NoCache;

impl NoCache {
    /// Creates the baseline strategy.
    pub fn new() -> Self {
        Self
    }
}

impl CacheStrategy for NoCache {
    fn name(&self) -> &str {
        "NONE"
    }

    fn store_node_count(&self) -> usize {
        0
    }

    fn store_reporting(&self) -> StoreReporting {
        StoreReporting::Snapshot
    }

    fn step(&mut self, _time: SimTime, _topology: &Topology, requests: &[Request]) -> StepResult {
        let mut result = StepResult::with_request_capacity(requests.len());

        for request in requests {
            let hops = charge_full_path(request, &mut result.tx_records);
            result.cache_records.push(CacheRecord {
                item: request.item(),
                hit: false,
            });
            result.hops_records.push(hops_record(request, hops));
        }

        result
    }
}
