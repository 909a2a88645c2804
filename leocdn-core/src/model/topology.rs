//! Per-step network topology snapshot.

use std::collections::HashMap;

use super::{NodeId, Request};

/// Shortest inter-satellite path between two satellites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatPath {
    pub path: Vec<NodeId>,
    pub distance: i64,
}

/// Nearest satellite of a ground station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GndSatLink {
    pub sat: NodeId,
    pub distance: i64,
}

/// Routing tables valid for one step.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub shortest_sat_paths: HashMap<NodeId, HashMap<NodeId, SatPath>>,
    pub gnd_sat_links: HashMap<NodeId, GndSatLink>,
}

/// Everything the orchestrator feeds to strategies for one step.
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    pub topology: Topology,
    pub requests: Vec<Request>,
}
