//! The city state aggregate and the snapshots published from it.
//!
//! One tick runs the subsystems in a fixed order, each reading the values
//! already updated earlier in the same tick:
//!
//! ```text
//! quantum → depin → optimisation (+ energy phase) → portfolio → traffic
//!         → ledger → history
//! ```

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::depin::{DePinNetwork, DePinNode};
use crate::geometry::Segment;
use crate::history::{DashboardSummary, PerformanceHistory, PerformanceSample};
use crate::ledger::{LedgerNode, LedgerSimulator, TransactionRecord};
use crate::optimization::{EnergyFlow, OptimizationProcess};
use crate::portfolio::CityPortfolio;
use crate::quantum::QuantumRegister;
use crate::random::RandomSource;
use crate::traffic::{TrafficNetwork, Vehicle};

/// Whether the clock is currently ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    Idle,
    Running,
}

/// Clock metadata stamped onto each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockInfo {
    pub status: ClockStatus,
    pub speed: f64,
}

impl ClockInfo {
    pub fn idle(speed: f64) -> Self {
        Self {
            status: ClockStatus::Idle,
            speed,
        }
    }
}

/// Every subsystem, exclusively owned by whoever drives the ticks.
#[derive(Debug, Clone)]
pub struct CityState {
    tick: u64,
    quantum: QuantumRegister,
    depin: DePinNetwork,
    optimization: OptimizationProcess,
    energy: EnergyFlow,
    portfolio: CityPortfolio,
    traffic: TrafficNetwork,
    ledger: LedgerSimulator,
    history: PerformanceHistory,
}

impl CityState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            tick: 0,
            quantum: QuantumRegister::new(),
            depin: DePinNetwork::new(),
            optimization: OptimizationProcess::new(),
            energy: EnergyFlow::new(),
            portfolio: CityPortfolio::new(),
            traffic: TrafficNetwork::new(),
            ledger: LedgerSimulator::with_capacity(config.edge_capacity, config.record_capacity),
            history: PerformanceHistory::new(config.history_capacity),
        }
    }

    /// Advance every subsystem by one tick.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, src: &mut R, speed: f64) {
        self.quantum.update(src);
        self.depin.update(&self.quantum, src);
        self.optimization.update(src);
        self.energy.advance(speed);
        let score = self.optimization.score();
        self.portfolio.update(score, src);
        self.traffic.advance(self.portfolio.traffic_efficiency());
        self.ledger.update(src);
        self.history.append(
            self.portfolio.building_efficiencies(),
            self.depin.nodes().iter().map(|n| n.transaction_volume),
            score,
            self.portfolio.traffic_efficiency(),
        );
        self.tick += 1;

        log::debug!(
            "tick {}: qubits {}/{}, depin active {}, score {:.3}",
            self.tick,
            self.quantum.active_count(),
            self.quantum.bits().len(),
            self.depin.active_count(),
            score
        );
    }

    /// Restore every subsystem to its initial value.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.quantum.reset();
        self.depin.reset();
        self.optimization.reset();
        self.energy.reset();
        self.portfolio.reset();
        self.traffic.reset();
        self.ledger.reset();
        self.history.clear();
    }

    /// Ticks since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn quantum(&self) -> &QuantumRegister {
        &self.quantum
    }

    pub fn depin(&self) -> &DePinNetwork {
        &self.depin
    }

    pub fn optimization(&self) -> &OptimizationProcess {
        &self.optimization
    }

    pub fn portfolio(&self) -> &CityPortfolio {
        &self.portfolio
    }

    pub fn ledger(&self) -> &LedgerSimulator {
        &self.ledger
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    /// Copy the current values into an immutable snapshot.
    pub fn snapshot(&self, clock: ClockInfo) -> Snapshot {
        Snapshot {
            tick: self.tick,
            clock,
            quantum_bits: self.quantum.bits().to_vec(),
            depin_nodes: self.depin.nodes().to_vec(),
            depin_connections: self.depin.connections().to_vec(),
            optimization_score: self.optimization.score(),
            energy_phase: self.energy.phase(),
            building_efficiencies: self.portfolio.building_efficiencies().to_vec(),
            infrastructure_efficiency: self.portfolio.infrastructure_efficiency(),
            traffic_efficiency: self.portfolio.traffic_efficiency(),
            vehicles: self.traffic.vehicles().to_vec(),
            ledger_nodes: self.ledger.nodes().to_vec(),
            transfer_edges: self.ledger.edges().copied().collect(),
            transactions: self.ledger.records().cloned().collect(),
            history: self.history.samples().cloned().collect(),
            history_capacity: self.history.capacity(),
        }
    }
}

impl Default for CityState {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

/// Complete read-only state as of the end of the most recent tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub clock: ClockInfo,
    pub quantum_bits: Vec<bool>,
    pub depin_nodes: Vec<DePinNode>,
    pub depin_connections: Vec<Segment>,
    pub optimization_score: f64,
    pub energy_phase: f64,
    pub building_efficiencies: Vec<f64>,
    pub infrastructure_efficiency: f64,
    pub traffic_efficiency: f64,
    pub vehicles: Vec<Vehicle>,
    pub ledger_nodes: Vec<LedgerNode>,
    /// Oldest first.
    pub transfer_edges: Vec<Segment>,
    /// Newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Oldest first.
    pub history: Vec<PerformanceSample>,
    /// Samples retained before the oldest is evicted.
    pub history_capacity: usize,
}

impl Snapshot {
    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::from_latest(self.history.last())
    }

    pub fn depin_volume(&self) -> f64 {
        self.depin_nodes.iter().map(|n| n.transaction_volume).sum()
    }
}
