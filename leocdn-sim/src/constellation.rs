//! Walker-style constellation geometry.
//!
//! Satellites are numbered plane by plane: satellite `plane * sats_per_plane + position`.

use leocdn_core::{NodeId, SimulationConfig};

/// Plane/position arithmetic for a constellation of equally sized planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constellation {
    sats_per_plane: i64,
    num_planes: i64,
}

impl Constellation {
    /// Creates a constellation; both dimensions must be positive.
    pub fn new(sats_per_plane: i64, num_planes: i64) -> Self {
        debug_assert!(sats_per_plane > 0 && num_planes > 0);
        Self {
            sats_per_plane,
            num_planes,
        }
    }

    /// Constellation described by the simulation parameters.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.sats_per_plane, config.num_planes)
    }

    /// Total number of satellites.
    pub fn satellite_count(&self) -> usize {
        (self.sats_per_plane * self.num_planes) as usize
    }

    /// Orbital plane of a satellite.
    pub fn plane(&self, sat: NodeId) -> i64 {
        sat.div_euclid(self.sats_per_plane)
    }

    /// Position of a satellite within its plane.
    pub fn position(&self, sat: NodeId) -> i64 {
        sat.rem_euclid(self.sats_per_plane)
    }

    /// Previous satellite in the same plane, wrapping from position 0 to the last one.
    pub fn backward_neighbor(&self, sat: NodeId) -> NodeId {
        let position = (self.position(sat) - 1).rem_euclid(self.sats_per_plane);
        self.plane(sat) * self.sats_per_plane + position
    }

    /// Satellite at the same position in the next plane, wrapping after the last plane.
    pub fn cross_plane_neighbor(&self, sat: NodeId) -> NodeId {
        let plane = (self.plane(sat) + 1).rem_euclid(self.num_planes);
        plane * self.sats_per_plane + self.position(sat)
    }
}

/// Orders an undirected edge lower id first.
pub fn normalized_edge(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_neighbor_wraps_within_plane() {
        let constellation = Constellation::new(66, 24);

        assert_eq!(constellation.backward_neighbor(70), 69);
        assert_eq!(constellation.backward_neighbor(66), 131);
        assert_eq!(constellation.backward_neighbor(0), 65);
    }

    #[test]
    fn test_cross_plane_neighbor_wraps_after_last_plane() {
        let constellation = Constellation::new(66, 24);

        assert_eq!(constellation.cross_plane_neighbor(5), 71);
        assert_eq!(constellation.cross_plane_neighbor(23 * 66 + 5), 5);
    }

    #[test]
    fn test_normalized_edge() {
        assert_eq!(normalized_edge(9, 3), (3, 9));
        assert_eq!(normalized_edge(3, 9), (3, 9));
    }

    #[test]
    fn test_default_constellation_size() {
        let constellation = Constellation::from_config(&SimulationConfig::default());
        assert_eq!(constellation.satellite_count(), 1584);
    }
}
