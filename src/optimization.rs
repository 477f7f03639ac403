//! Annealing progress and the energy-flow phase.
//!
//! The optimisation score random-walks upward and saturates at 1:
//!
//! ```text
//! score = min(1, score + u * 0.05)
//! ```
//!
//! Only [`OptimizationProcess::reset`] ever lowers it. The energy-flow phase
//! is a deterministic accumulator, `phase = (phase + 0.02 * speed) mod 1`,
//! that drives the dash animation on the energy lines.

use crate::random::RandomSource;

const MAX_STEP: f64 = 0.05;
const PHASE_RATE: f64 = 0.02;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationProcess {
    score: f64,
}

impl OptimizationProcess {
    pub fn new() -> Self {
        Self { score: 0.0 }
    }

    /// One annealing step, one draw.
    pub fn update<R: RandomSource + ?Sized>(&mut self, src: &mut R) {
        self.score = (self.score + src.uniform() * MAX_STEP).min(1.0);
    }

    pub fn reset(&mut self) {
        self.score = 0.0;
    }

    /// Current score in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn has_converged(&self) -> bool {
        self.score >= 1.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyFlow {
    phase: f64,
}

impl EnergyFlow {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Advance the phase by an amount proportional to the simulation speed.
    pub fn advance(&mut self, speed: f64) {
        self.phase = (self.phase + PHASE_RATE * speed).rem_euclid(1.0);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Phase in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }
}
