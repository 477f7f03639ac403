//! Building, infrastructure and traffic efficiencies.
//!
//! Each value is a clamped random walk on `[0, 1]` with a symmetric noise term
//! and an upward bias proportional to the current optimisation score:
//!
//! | value          | noise | bias        |
//! |----------------|-------|-------------|
//! | building (×9)  | 0.05  | score·0.02  |
//! | infrastructure | 0.02  | score·0.01  |
//! | traffic        | 0.02  | score·0.01  |

use crate::random::{clamped_walk, RandomSource};

pub const BUILDING_COUNT: usize = 9;
pub const INITIAL_EFFICIENCY: f64 = 0.5;

const BUILDING_NOISE: f64 = 0.05;
const BUILDING_BIAS: f64 = 0.02;
const NETWORK_NOISE: f64 = 0.02;
const NETWORK_BIAS: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct CityPortfolio {
    buildings: [f64; BUILDING_COUNT],
    infrastructure: f64,
    traffic: f64,
}

impl CityPortfolio {
    pub fn new() -> Self {
        Self {
            buildings: [INITIAL_EFFICIENCY; BUILDING_COUNT],
            infrastructure: INITIAL_EFFICIENCY,
            traffic: INITIAL_EFFICIENCY,
        }
    }

    /// Draws, in order: one per building, infrastructure, traffic.
    pub fn update<R: RandomSource + ?Sized>(&mut self, optimization_score: f64, src: &mut R) {
        for e in self.buildings.iter_mut() {
            *e = clamped_walk(
                *e,
                src.uniform(),
                BUILDING_NOISE,
                optimization_score * BUILDING_BIAS,
            );
        }
        self.infrastructure = clamped_walk(
            self.infrastructure,
            src.uniform(),
            NETWORK_NOISE,
            optimization_score * NETWORK_BIAS,
        );
        self.traffic = clamped_walk(
            self.traffic,
            src.uniform(),
            NETWORK_NOISE,
            optimization_score * NETWORK_BIAS,
        );
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn building_efficiencies(&self) -> &[f64] {
        &self.buildings
    }

    pub fn infrastructure_efficiency(&self) -> f64 {
        self.infrastructure
    }

    pub fn traffic_efficiency(&self) -> f64 {
        self.traffic
    }

    pub fn average_efficiency(&self) -> f64 {
        self.buildings.iter().sum::<f64>() / BUILDING_COUNT as f64
    }
}

impl Default for CityPortfolio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSource, SeededSource};

    #[test]
    fn one_step_with_fixed_draws() {
        let mut p = CityPortfolio::new();
        p.update(0.03, &mut FixedSource::new(0.6));
        for &e in p.building_efficiencies() {
            assert!((e - 0.5056).abs() < 1e-9, "building {}", e);
        }
        assert!((p.infrastructure_efficiency() - 0.5023).abs() < 1e-9);
        assert!((p.traffic_efficiency() - 0.5023).abs() < 1e-9);
    }

    #[test]
    fn efficiencies_stay_in_unit_interval() {
        let mut p = CityPortfolio::new();
        let mut rng = SeededSource::from_seed(5);
        for step in 0..3_000 {
            let score = if step < 1_000 { 0.0 } else { 1.0 };
            p.update(score, &mut rng);
            for &e in p.building_efficiencies() {
                assert!((0.0..=1.0).contains(&e));
            }
            assert!((0.0..=1.0).contains(&p.infrastructure_efficiency()));
            assert!((0.0..=1.0).contains(&p.traffic_efficiency()));
        }
        // full bias outweighs the noise, so the walk hugs the ceiling
        assert!(p.average_efficiency() > 0.98);
    }

    #[test]
    fn low_draws_clamp_at_zero() {
        let mut p = CityPortfolio::new();
        for _ in 0..100 {
            p.update(0.0, &mut FixedSource::new(0.0));
        }
        assert!(p.building_efficiencies().iter().all(|&e| e == 0.0));
        assert_eq!(p.traffic_efficiency(), 0.0);
    }

    #[test]
    fn reset_restores_half() {
        let mut p = CityPortfolio::new();
        p.update(1.0, &mut FixedSource::new(0.9));
        p.reset();
        assert_eq!(p, CityPortfolio::new());
        assert_eq!(p.average_efficiency(), 0.5);
    }
}
