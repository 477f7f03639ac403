//! DePIN sensor network on a 3×3 grid.
//!
//! ## Update rule
//!
//! For node `i`, activity is gated by qubit `i mod N`:
//!
//! ```text
//! active[i] = qubit[i mod N] && u > 0.3
//! volume[i] = max(0, volume[i] + (active[i] ? 0.1 : -0.05))
//! ```
//!
//! The draw `u` is only taken when the gate is open, so a closed gate
//! consumes no randomness.
//!
//! ## Topology
//!
//! Nodes sit on a 3×3 grid with spacing 5 offset by (35, 0, -35). Each node
//! links to its right neighbour (column < 2) and the node below (row < 2),
//! which gives 12 fixed connections. The layout never changes, so the
//! connection list is computed once at construction.

use serde::Serialize;

use crate::geometry::{Segment, Vec3};
use crate::quantum::QuantumRegister;
use crate::random::RandomSource;

/// Number of nodes in the network.
pub const NODE_COUNT: usize = 9;
/// Nodes per grid row.
pub const GRID_WIDTH: usize = 3;
/// Distance between neighbouring nodes.
pub const GRID_SPACING: f64 = 5.0;
/// World-space position of node 0.
pub const GRID_ORIGIN: Vec3 = [35.0, 0.0, -35.0];

const ACTIVATION_THRESHOLD: f64 = 0.3;
const ACTIVE_INCREMENT: f64 = 0.1;
const IDLE_DECREMENT: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DePinNode {
    pub index: usize,
    pub active: bool,
    /// Accumulated transaction volume; never negative, no upper bound.
    pub transaction_volume: f64,
}

impl DePinNode {
    fn new(index: usize) -> Self {
        Self {
            index,
            active: false,
            transaction_volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DePinNetwork {
    nodes: Vec<DePinNode>,
    connections: Vec<Segment>,
}

impl DePinNetwork {
    pub fn new() -> Self {
        Self {
            nodes: (0..NODE_COUNT).map(DePinNode::new).collect(),
            connections: grid_connections(NODE_COUNT),
        }
    }

    /// Advance node activity and volume from the register's current bits.
    pub fn update<R: RandomSource + ?Sized>(&mut self, register: &QuantumRegister, src: &mut R) {
        for node in self.nodes.iter_mut() {
            node.active = register.gate(node.index) && src.uniform() > ACTIVATION_THRESHOLD;
            let delta = if node.active {
                ACTIVE_INCREMENT
            } else {
                -IDLE_DECREMENT
            };
            node.transaction_volume = (node.transaction_volume + delta).max(0.0);
        }
    }

    /// Clear activity and volume. Connections are static and kept.
    pub fn reset(&mut self) {
        for node in self.nodes.iter_mut() {
            node.active = false;
            node.transaction_volume = 0.0;
        }
    }

    pub fn nodes(&self) -> &[DePinNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Segment] {
        &self.connections
    }

    pub fn total_volume(&self) -> f64 {
        self.nodes.iter().map(|n| n.transaction_volume).sum()
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }
}

impl Default for DePinNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// World-space position of grid node `index`.
pub fn node_position(index: usize) -> Vec3 {
    let col = (index % GRID_WIDTH) as f64;
    let row = (index / GRID_WIDTH) as f64;
    [
        GRID_ORIGIN[0] + col * GRID_SPACING,
        GRID_ORIGIN[1],
        GRID_ORIGIN[2] + row * GRID_SPACING,
    ]
}

/// Right and down edges of a grid `GRID_WIDTH` nodes wide.
pub fn grid_connections(node_count: usize) -> Vec<Segment> {
    let mut edges = Vec::new();
    for i in 0..node_count {
        if i % GRID_WIDTH < GRID_WIDTH - 1 && i + 1 < node_count {
            edges.push(Segment::new(node_position(i), node_position(i + 1)));
        }
        if i + GRID_WIDTH < node_count {
            edges.push(Segment::new(node_position(i), node_position(i + GRID_WIDTH)));
        }
    }
    edges
}
