//! Static lookup tables shared read-only across all strategies and steps.

use std::collections::HashMap;

use super::{ItemId, NodeId};

/// Item id to item size in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSizeTable {
    sizes: HashMap<ItemId, u64>,
}

impl ItemSizeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the size of an item, replacing any previous entry.
    pub fn insert(&mut self, item: ItemId, size: u64) {
        self.sizes.insert(item, size);
    }

    /// Size of an item; unknown items weigh nothing.
    pub fn size_of(&self, item: ItemId) -> u64 {
        self.sizes.get(&item).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl FromIterator<(ItemId, u64)> for ItemSizeTable {
    fn from_iter<T: IntoIterator<Item = (ItemId, u64)>>(iter: T) -> Self {
        Self {
            sizes: iter.into_iter().collect(),
        }
    }
}

/// Ground station id to client population, kept in file order.
///
/// File order matters: it fixes the order in which replicas are created and
/// therefore keeps replica ids and store-node listings reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GstPopulationTable {
    entries: Vec<(NodeId, u64)>,
}

impl GstPopulationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a ground station with its population.
    pub fn push(&mut self, gst: NodeId, population: u64) {
        self.entries.push((gst, population));
    }

    /// Iterates over (ground station, population) pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(NodeId, u64)> for GstPopulationTable {
    fn from_iter<T: IntoIterator<Item = (NodeId, u64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_item_has_zero_size() {
        let table: ItemSizeTable = [(1, 500)].into_iter().collect();
        assert_eq!(table.size_of(1), 500);
        assert_eq!(table.size_of(2), 0);
    }

    #[test]
    fn test_population_table_keeps_file_order() {
        let table: GstPopulationTable = [(-1, 30), (-2, 10), (-3, 20)].into_iter().collect();
        let entries: Vec<_> = table.iter().collect();

        assert_eq!(entries, vec![(-1, 30), (-2, 10), (-3, 20)]);
        assert_eq!(table.len(), 3);
    }
}
