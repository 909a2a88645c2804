//! Per-satellite item sets shared by the satellite cache variants.

use std::collections::{BTreeMap, BTreeSet};

use leocdn_core::{
    CacheRecord, ItemId, ItemSizeTable, NodeId, Request, StepResult, StoreRecord, TxRecord,
};

use super::{charge_full_path, hops_record};
use crate::constellation::normalized_edge;

/// Unbounded, non-evicting item sets keyed by satellite.
///
/// Ordered collections keep store snapshots and propagation charges in a
/// reproducible order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SatelliteStore {
    caches: BTreeMap<NodeId, BTreeSet<ItemId>>,
}

impl SatelliteStore {
    /// Creates a store with every satellite empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the satellite holds the item.
    pub fn contains(&self, sat: NodeId, item: ItemId) -> bool {
        self.caches
            .get(&sat)
            .is_some_and(|items| items.contains(&item))
    }

    /// Inserts an item; returns false if the satellite already held it.
    pub fn insert(&mut self, sat: NodeId, item: ItemId) -> bool {
        self.caches.entry(sat).or_default().insert(item)
    }

    /// Items held by one satellite.
    #[cfg(test)]
    pub(crate) fn items(&self, sat: NodeId) -> impl Iterator<Item = ItemId> + '_ {
        self.caches.get(&sat).into_iter().flatten().copied()
    }

    /// Total number of (satellite, item) pairs.
    pub fn len(&self) -> usize {
        self.caches.values().map(BTreeSet::len).sum()
    }

    /// Returns true when no satellite holds anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached item at once.
    pub fn clear(&mut self) {
        self.caches = BTreeMap::new();
    }

    /// Every (satellite, item) pair currently held.
    pub fn snapshot(&self) -> Vec<StoreRecord> {
        self.caches
            .iter()
            .flat_map(|(&node, items)| items.iter().map(move |&item| StoreRecord { node, item }))
            .collect()
    }

    /// Serves requests from the first satellite on each path.
    ///
    /// A hit costs one hop from the ground station to that satellite, a miss
    /// costs the full path. Requested items are cached on the first satellite
    /// once all requests of the step are served; store records are a full
    /// snapshot taken afterwards.
    pub fn serve(&mut self, requests: &[Request]) -> StepResult {
        let mut result = StepResult::with_request_capacity(requests.len());
        let mut pending = Vec::with_capacity(requests.len());

        for request in requests {
            let sat = request.first_satellite();
            let hit = self.contains(sat, request.item());

            let hops = if hit {
                result.tx_records.push(TxRecord {
                    source: request.origin(),
                    target: sat,
                    bandwidth: request.bandwidth(),
                });
                1
            } else {
                charge_full_path(request, &mut result.tx_records)
            };

            result.cache_records.push(CacheRecord {
                item: request.item(),
                hit,
            });
            result.hops_records.push(hops_record(request, hops));
            pending.push((sat, request.item()));
        }

        for (sat, item) in pending {
            self.insert(sat, item);
        }

        result.store_records = self.snapshot();
        result
    }

    /// Copies every satellite's items to its neighbor and rebuilds the store.
    ///
    /// Each target ends up with the union of its previous items and its
    /// source's items; every item new to the target is charged once, at its
    /// size, on the normalized source/target edge. Satellites that are not
    /// the neighbor of any non-empty cache are left out of the rebuilt store.
    pub fn propagate<F>(&mut self, neighbor: F, item_sizes: &ItemSizeTable) -> Vec<TxRecord>
    where
        F: Fn(NodeId) -> NodeId,
    {
        let mut rebuilt: BTreeMap<NodeId, BTreeSet<ItemId>> = BTreeMap::new();
        let mut tx_records = Vec::new();

        for (&sat, items) in self.caches.iter().filter(|(_, items)| !items.is_empty()) {
            let target = neighbor(sat);
            let previous = self.caches.get(&target);
            let (source, edge_target) = normalized_edge(sat, target);

            let merged = rebuilt
                .entry(target)
                .or_insert_with(|| previous.cloned().unwrap_or_default());

            for &item in items {
                merged.insert(item);
                if previous.is_some_and(|held| held.contains(&item)) {
                    continue;
                }
                tx_records.push(TxRecord {
                    source,
                    target: edge_target,
                    bandwidth: item_sizes.size_of(item),
                });
            }
        }

        self.caches = rebuilt;
        tx_records
    }
}
