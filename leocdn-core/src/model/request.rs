//! Content requests issued by ground stations.

use super::{ItemId, NodeId};
use crate::input::InputError;

/// A single content request routed along a precomputed path.
///
/// The path always holds at least two nodes: the requesting ground station
/// at index 0 followed by the first satellite it reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    item: ItemId,
    bandwidth: u64,
    path: Vec<NodeId>,
}

impl Request {
    /// Creates a request after validating its path.
    ///
    /// # Errors
    ///
    /// - `InputError::PathTooShort` - Path has fewer than two nodes
    pub fn new(item: ItemId, bandwidth: u64, path: Vec<NodeId>) -> Result<Self, InputError> {
        if path.len() < 2 {
            return Err(InputError::PathTooShort {
                item,
                length: path.len(),
            });
        }
        Ok(Self {
            item,
            bandwidth,
            path,
        })
    }

    /// Requested item id.
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Item size, charged on every traversed edge.
    pub fn bandwidth(&self) -> u64 {
        self.bandwidth
    }

    /// Full route from the origin ground station to the content origin.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Ground station that issued the request.
    pub fn origin(&self) -> NodeId {
        self.path[0]
    }

    /// First satellite on the route.
    pub fn first_satellite(&self) -> NodeId {
        self.path[1]
    }

    /// Number of edges on the full route.
    pub fn full_path_hops(&self) -> u64 {
        (self.path.len() - 1) as u64
    }

    /// Iterates over the directed edges of the full route.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.path.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_single_node_path() {
        let err = Request::new(1, 10, vec![-1]).unwrap_err();
        assert!(matches!(err, InputError::PathTooShort { item: 1, length: 1 }));
    }

    #[test]
    fn test_request_edges_follow_path_order() {
        let request = Request::new(1, 500, vec![10, 20, 30]).unwrap();
        let edges: Vec<_> = request.edges().collect();

        assert_eq!(edges, vec![(10, 20), (20, 30)]);
        assert_eq!(request.full_path_hops(), 2);
        assert_eq!(request.origin(), 10);
        assert_eq!(request.first_satellite(), 20);
    }
}
