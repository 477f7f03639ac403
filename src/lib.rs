//! # quantum-smart-city-sim
//!
//! Stochastic state engine behind the quantum smart-city DePIN visualisation.
//! Five loosely coupled subsystems advance together on a timer:
//!
//! ```text
//! Quantum register (5 qubits, re-measured every tick)
//!   ↓ gate: node i active only if qubit i mod 5 reads 1
//! DePIN network (3×3 grid, per-node transaction volume)
//!
//! Optimisation score (annealing progress, saturates at 1)
//!   ↓ bias
//! City portfolio (building / infrastructure / traffic efficiency)
//!   ↓ speed
//! Traffic network (vehicles)
//!
//! Ledger (transfer edges between 3 blocks, transaction feed)
//!
//! → Performance history (last 20 samples for the charts)
//! ```
//!
//! None of it is physics: every update rule is decorative randomness, kept
//! exact so runs are reproducible under a seeded [`random::RandomSource`].
//!
//! ## Usage
//!
//! ```no_run
//! use quantum_smart_city_sim::prelude::*;
//!
//! let clock = SimulationClock::new(SimulationConfig::default())?;
//! clock.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(3));
//! clock.set_speed(5.0)?;
//! let snapshot = clock.snapshot();
//! println!("{}", snapshot.dashboard());
//! let scene = SceneGeometry::from_snapshot(&snapshot);
//! println!("{} buildings", scene.buildings.len());
//! # Ok::<(), SimError>(())
//! ```

pub mod clock;
pub mod config;
pub mod depin;
pub mod error;
pub mod geometry;
pub mod history;
pub mod ledger;
pub mod optimization;
pub mod portfolio;
pub mod quantum;
pub mod random;
pub mod scene;
pub mod state;
pub mod traffic;

pub mod prelude {
    pub use crate::clock::SimulationClock;
    pub use crate::config::SimulationConfig;
    pub use crate::error::SimError;
    pub use crate::history::{DashboardSummary, PerformanceSample};
    pub use crate::ledger::{TransactionGraph, TransactionRecord, TransactionStatus};
    pub use crate::random::{FixedSource, RandomSource, SeededSource, SequenceSource};
    pub use crate::scene::SceneGeometry;
    pub use crate::state::{CityState, ClockInfo, ClockStatus, Snapshot};
}
