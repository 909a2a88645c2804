//! Per-step metrics computed from raw strategy records.

use std::collections::HashMap;

use leocdn_core::model::is_ground_node;
use leocdn_core::{CacheRecord, HopsRecord, ItemSizeTable, NodeId, StoreRecord, TxRecord};

use super::stats::Summary;

/// Storage distribution across a strategy's store nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageMetrics {
    /// Bytes held per storing node
    pub summary: Summary,
    /// Nodes able to hold items
    pub num_nodes: usize,
    /// Nodes currently holding zero bytes
    pub no_store_nodes: usize,
}

/// Hit ratio over a step's requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheMetrics {
    /// hits / requests, NaN without requests
    pub ratio: f64,
    /// Requests served in the step
    pub num_requests: usize,
}

/// Everything written to the summary artifacts of one step and strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// `tx` artifact
    pub bandwidth: Summary,
    /// `store` artifact
    pub storage: StorageMetrics,
    /// `cache` artifact
    pub cache: CacheMetrics,
    /// `hops` artifact
    pub hops: Summary,
}

/// Bandwidth per satellite; `total` is the traffic of all records, ground links included.
pub fn bandwidth(records: &[TxRecord]) -> Summary {
    let mut per_node: HashMap<NodeId, u64> = HashMap::new();
    let mut total = 0u64;

    for record in records {
        total += record.bandwidth;

        for node in [record.source, record.target] {
            if !is_ground_node(node) {
                *per_node.entry(node).or_default() += record.bandwidth;
            }
        }
    }

    let nodes = per_node.len();
    let summary = Summary::of(per_node.into_values().collect(), nodes).unwrap_or_else(Summary::zero);
    Summary { total, ..summary }
}

/// Adds the bytes of every stored item to its node's total.
pub fn accumulate_storage(
    records: &[StoreRecord],
    item_sizes: &ItemSizeTable,
    per_node: &mut HashMap<NodeId, u64>,
) {
    for record in records {
        *per_node.entry(record.node).or_default() += item_sizes.size_of(record.item);
    }
}

/// Storage distribution over `store_nodes` nodes; nodes missing from `per_node` hold nothing.
pub fn storage(per_node: &HashMap<NodeId, u64>, store_nodes: usize) -> StorageMetrics {
    let mut values: Vec<u64> = per_node.values().copied().collect();
    let storing = values.iter().filter(|&&bytes| bytes > 0).count();

    if values.len() < store_nodes {
        values.resize(store_nodes, 0);
    }

    let summary = if store_nodes == 0 {
        Summary::zero()
    } else {
        Summary::of(values, store_nodes).unwrap_or_else(Summary::zero)
    };

    StorageMetrics {
        summary,
        num_nodes: store_nodes,
        no_store_nodes: store_nodes.saturating_sub(storing),
    }
}

/// Share of requests served from a cache.
pub fn cache(records: &[CacheRecord]) -> CacheMetrics {
    let hits = records.iter().filter(|r| r.hit).count();
    CacheMetrics {
        ratio: hits as f64 / records.len() as f64,
        num_requests: records.len(),
    }
}

/// Hop counts averaged over the step's requests.
pub fn hops(records: &[HopsRecord]) -> Summary {
    Summary::of(records.iter().map(|r| r.hops).collect(), records.len())
        .unwrap_or_else(Summary::undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandwidth_excludes_ground_nodes_from_distribution() {
        let records = [
            TxRecord {
                source: -1,
                target: 20,
                bandwidth: 500,
            },
            TxRecord {
                source: 20,
                target: 30,
                bandwidth: 500,
            },
        ];

        let summary = bandwidth(&records);

        assert_eq!(summary.total, 1000);
        assert_eq!(summary.max, 1000);
        assert_eq!(summary.min, 500);
        assert_eq!(summary.avg, 750.0);
    }

    #[test]
    fn test_bandwidth_without_satellites_is_zero() {
        let records = [TxRecord {
            source: -1,
            target: -2,
            bandwidth: 10,
        }];

        let summary = bandwidth(&records);

        assert_eq!(summary.total, 10);
        assert_eq!(summary.max, 0);
        assert_eq!(summary.avg, 0.0);
    }

    #[test]
    fn test_storage_pads_empty_nodes() {
        let sizes: ItemSizeTable = [(1, 100), (2, 50)].into_iter().collect();
        let mut per_node = HashMap::new();
        accumulate_storage(
            &[
                StoreRecord { node: 20, item: 1 },
                StoreRecord { node: 20, item: 2 },
                StoreRecord { node: 30, item: 2 },
            ],
            &sizes,
            &mut per_node,
        );

        let metrics = storage(&per_node, 4);

        assert_eq!(metrics.summary.total, 200);
        assert_eq!(metrics.summary.max, 150);
        assert_eq!(metrics.summary.min, 0);
        assert_eq!(metrics.summary.avg, 50.0);
        assert_eq!(metrics.num_nodes, 4);
        assert_eq!(metrics.no_store_nodes, 2);
    }

    #[test]
    fn test_storage_without_store_nodes() {
        let metrics = storage(&HashMap::new(), 0);

        assert_eq!(metrics.summary, Summary::zero());
        assert_eq!(metrics.no_store_nodes, 0);
    }

    #[test]
    fn test_cache_ratio() {
        let metrics = cache(&[
            CacheRecord { item: 1, hit: true },
            CacheRecord { item: 2, hit: false },
        ]);
        assert_eq!(metrics.ratio, 0.5);
        assert_eq!(metrics.num_requests, 2);

        assert!(cache(&[]).ratio.is_nan());
    }

    #[test]
    fn test_hops_without_requests_is_undefined() {
        let summary = hops(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.avg.is_nan());
        assert!(summary.median.is_nan());
    }
}
