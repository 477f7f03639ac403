//! Vehicles on the traffic strip.
//!
//! Three vehicles move along x at a base speed scaled by the city's traffic
//! efficiency and wrap from the far end (x > 10) back to x = -10.

use serde::Serialize;

use crate::geometry::Vec3;

const LANE_MIN: f64 = -10.0;
const LANE_MAX: f64 = 10.0;

/// (start x, base speed) for each vehicle.
const FLEET: [(f64, f64); 3] = [(-5.0, 0.05), (0.0, 0.03), (5.0, 0.04)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub position: Vec3,
    pub base_speed: f64,
    /// Speed applied on the most recent advance.
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficNetwork {
    vehicles: Vec<Vehicle>,
}

impl TrafficNetwork {
    pub fn new() -> Self {
        Self {
            vehicles: FLEET
                .iter()
                .map(|&(x, base_speed)| Vehicle {
                    position: [x, 0.0, 0.0],
                    base_speed,
                    speed: 0.0,
                })
                .collect(),
        }
    }

    /// Move every vehicle one step at `base_speed * traffic_efficiency`.
    pub fn advance(&mut self, traffic_efficiency: f64) {
        for v in self.vehicles.iter_mut() {
            v.speed = v.base_speed * traffic_efficiency;
            v.position[0] += v.speed;
            if v.position[0] > LANE_MAX {
                v.position[0] = LANE_MIN;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }
}

impl Default for TrafficNetwork {
    fn default() -> Self {
        Self::new()
    }
}
