//! Scene geometry derived from a snapshot.
//!
//! Positions, scales and line strips the 3D view draws each frame. Building
//! the scene is a pure function of the snapshot. Every line passes through
//! coordinate validation first; a line that fails is logged and left out of
//! the scene for this frame, the rest of the scene is unaffected.

use std::f64::consts::PI;

use serde::Serialize;

use crate::depin;
use crate::geometry::{offset, validate_point, validate_polyline, validate_segment, Segment, Vec3};
use crate::state::Snapshot;

const QUANTUM_ORIGIN: Vec3 = [-35.0, 0.0, -35.0];
const QUBIT_SPACING: f64 = 4.0;
const CITY_ORIGIN: Vec3 = [0.0, 0.0, 50.0];
const BUILDING_SPACING: f64 = 6.0;
const INFRASTRUCTURE_ORIGIN: Vec3 = [0.0, 0.0, 20.0];
const TRAFFIC_ORIGIN: Vec3 = [0.0, 0.0, -20.0];
const FIELD_ORIGIN: Vec3 = [0.0, -6.0, 0.0];
const FIELD_SCALE: f64 = 60.0;
const FIELD_SEGMENTS: usize = 30;
const ENERGY_SINK: Vec3 = [0.0, 10.0, 50.0];
const ENERGY_SOURCES: [Vec3; 2] = [[-30.0, 0.0, -30.0], [30.0, 0.0, -30.0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    Energy,
    Traffic,
    Safety,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sphere {
    pub position: Vec3,
    pub scale: f64,
    pub lit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    /// Centre of the box; its base sits on the ground plane.
    pub position: Vec3,
    pub height: f64,
    pub opacity: f64,
    pub kind: BuildingKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLine {
    pub segment: Segment,
    /// Dash offset animating the flow.
    pub dash_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneGeometry {
    pub qubits: Vec<Sphere>,
    pub depin_nodes: Vec<Sphere>,
    pub depin_links: Vec<Segment>,
    pub ledger_nodes: Vec<Label>,
    pub transfer_lines: Vec<Segment>,
    pub buildings: Vec<Building>,
    pub energy_flows: Vec<FlowLine>,
    pub infrastructure: Vec<Vec3>,
    pub vehicles: Vec<Vec3>,
    pub optimization_field: Vec<Vec3>,
    /// Elements left out because their geometry failed validation.
    pub omitted: usize,
}

impl SceneGeometry {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut scene = SceneGeometry::default();

        scene.qubits = snapshot
            .quantum_bits
            .iter()
            .enumerate()
            .map(|(i, &on)| Sphere {
                position: offset([i as f64 * QUBIT_SPACING, 0.0, 0.0], QUANTUM_ORIGIN),
                scale: if on { 1.2 } else { 1.0 },
                lit: on,
            })
            .collect();

        scene.depin_nodes = snapshot
            .depin_nodes
            .iter()
            .map(|n| Sphere {
                position: depin::node_position(n.index),
                scale: 1.0 + n.transaction_volume * 0.5,
                lit: n.active,
            })
            .collect();

        scene.depin_links = scene.keep_segments("depin connection", &snapshot.depin_connections);
        scene.transfer_lines = scene.keep_segments("transfer edge", &snapshot.transfer_edges);

        for node in &snapshot.ledger_nodes {
            match validate_point(&node.position) {
                Ok(()) => scene.ledger_nodes.push(Label {
                    text: node.label.clone(),
                    position: node.position,
                }),
                Err(e) => scene.omit("ledger node", &e),
            }
        }

        scene.buildings = snapshot
            .building_efficiencies
            .iter()
            .enumerate()
            .map(|(i, &e)| building(i, e))
            .collect();

        for source in ENERGY_SOURCES {
            let segment = Segment::new(source, ENERGY_SINK);
            match validate_segment(&segment) {
                Ok(()) => scene.energy_flows.push(FlowLine {
                    segment,
                    dash_offset: -snapshot.energy_phase,
                }),
                Err(e) => scene.omit("energy flow", &e),
            }
        }

        let grid = infrastructure_line(snapshot.infrastructure_efficiency);
        match validate_polyline(&grid) {
            Ok(()) => scene.infrastructure = grid,
            Err(e) => scene.omit("infrastructure line", &e),
        }

        scene.vehicles = snapshot
            .vehicles
            .iter()
            .map(|v| offset(v.position, TRAFFIC_ORIGIN))
            .collect();

        let field = optimization_field(snapshot.optimization_score);
        match validate_polyline(&field) {
            Ok(()) => scene.optimization_field = field,
            Err(e) => scene.omit("optimization field", &e),
        }

        scene
    }

    fn keep_segments(&mut self, what: &str, segments: &[Segment]) -> Vec<Segment> {
        let mut kept = Vec::with_capacity(segments.len());
        for (i, s) in segments.iter().enumerate() {
            match validate_segment(s) {
                Ok(()) => kept.push(*s),
                Err(e) => self.omit(&format!("{}[{}]", what, i), &e),
            }
        }
        kept
    }

    fn omit(&mut self, what: &str, err: &dyn std::error::Error) {
        log::warn!("{}: invalid geometry, skipped this frame: {}", what, err);
        self.omitted += 1;
    }
}

fn building(i: usize, efficiency: f64) -> Building {
    let height = 3.0 + efficiency * 10.0;
    let x = ((i % 3) as f64 - 1.0) * BUILDING_SPACING;
    let z = (i / 3) as f64 * BUILDING_SPACING - BUILDING_SPACING;
    let kind = match i % 3 {
        0 => BuildingKind::Energy,
        1 => BuildingKind::Traffic,
        _ => BuildingKind::Safety,
    };
    Building {
        position: offset([x, height / 2.0, z], CITY_ORIGIN),
        height,
        opacity: 0.6 + efficiency * 0.4,
        kind,
    }
}

/// Power-line arc whose apex rises with infrastructure efficiency.
pub fn infrastructure_line(efficiency: f64) -> Vec<Vec3> {
    [[-10.0, 0.0, 0.0], [0.0, efficiency * 5.0, 0.0], [10.0, 0.0, 0.0]]
        .into_iter()
        .map(|p| offset(p, INFRASTRUCTURE_ORIGIN))
        .collect()
}

/// Rippled surface, `(FIELD_SEGMENTS + 1)²` points, phase-shifted by the score.
pub fn optimization_field(score: f64) -> Vec<Vec3> {
    let n = FIELD_SEGMENTS as f64;
    let mut points = Vec::with_capacity((FIELD_SEGMENTS + 1) * (FIELD_SEGMENTS + 1));
    for i in 0..=FIELD_SEGMENTS {
        for j in 0..=FIELD_SEGMENTS {
            let x = (i as f64 / n - 0.5) * FIELD_SCALE;
            let z = (j as f64 / n - 0.5) * FIELD_SCALE;
            let y = (x * PI * 2.0 + z * PI * 2.0 + score * PI * 2.0).sin() * 0.5;
            points.push(offset([x, y, z], FIELD_ORIGIN));
        }
    }
    points
}
