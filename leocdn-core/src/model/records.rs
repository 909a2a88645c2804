//! Per-step records produced by strategies and consumed by the aggregator.

use super::{ItemId, NodeId, SimTime};

/// Bandwidth charged on one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub bandwidth: u64,
}

/// An item held in a node's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreRecord {
    pub node: NodeId,
    pub item: ItemId,
}

/// Outcome of a cache lookup for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRecord {
    pub item: ItemId,
    pub hit: bool,
}

/// Number of edges a request traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopsRecord {
    pub item: ItemId,
    pub hops: u64,
}

/// Everything one strategy produced for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    pub tx_records: Vec<TxRecord>,
    pub store_records: Vec<StoreRecord>,
    pub cache_records: Vec<CacheRecord>,
    pub hops_records: Vec<HopsRecord>,
}

impl StepResult {
    /// Creates an empty result with room for one cache and hops record per request.
    pub fn with_request_capacity(requests: usize) -> Self {
        Self {
            tx_records: Vec::new(),
            store_records: Vec::new(),
            cache_records: Vec::with_capacity(requests),
            hops_records: Vec::with_capacity(requests),
        }
    }

    /// Number of cache hits recorded in this step.
    pub fn hit_count(&self) -> usize {
        self.cache_records.iter().filter(|r| r.hit).count()
    }
}

/// A step result tagged with the step time and the strategy that produced it.
#[derive(Debug, Clone)]
pub struct WriteSet {
    pub time: SimTime,
    pub strategy: String,
    pub result: StepResult,
}
