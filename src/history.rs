//! Rolling performance history for the dashboard charts.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

/// One row of the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSample {
    /// 1-based, increases by one per appended sample since the last reset.
    pub step: u64,
    /// Mean building efficiency, percent.
    pub avg_energy_efficiency: f64,
    /// Sum of DePIN transaction volume over all nodes.
    pub depin_volume: f64,
    /// Optimisation score, percent.
    pub optimization_score: f64,
    /// Traffic efficiency, percent.
    pub traffic_efficiency: f64,
}

#[derive(Debug, Clone)]
pub struct PerformanceHistory {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
}

impl PerformanceHistory {
    /// Keeps at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Aggregate the current subsystem values into a sample and append it,
    /// dropping the oldest sample once the history is full.
    pub fn append(
        &mut self,
        building_efficiencies: &[f64],
        depin_volumes: impl IntoIterator<Item = f64>,
        optimization_score: f64,
        traffic_efficiency: f64,
    ) -> &PerformanceSample {
        let step = self.samples.back().map_or(1, |s| s.step + 1);
        let avg = if building_efficiencies.is_empty() {
            0.0
        } else {
            building_efficiencies.iter().sum::<f64>() / building_efficiencies.len() as f64
        };
        self.samples.push_back(PerformanceSample {
            step,
            avg_energy_efficiency: avg * 100.0,
            depin_volume: depin_volumes.into_iter().sum(),
            optimization_score: optimization_score * 100.0,
            traffic_efficiency: traffic_efficiency * 100.0,
        });
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        &self.samples[self.samples.len() - 1]
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.samples.back()
    }

    /// Oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub avg_energy_efficiency: f64,
    pub depin_volume: f64,
    pub optimization_score: f64,
    pub traffic_efficiency: f64,
}

impl DashboardSummary {
    /// Values of the latest sample, all zero when nothing has been recorded.
    pub fn from_latest(latest: Option<&PerformanceSample>) -> Self {
        latest.map_or_else(Self::default, |s| Self {
            avg_energy_efficiency: s.avg_energy_efficiency,
            depin_volume: s.depin_volume,
            optimization_score: s.optimization_score,
            traffic_efficiency: s.traffic_efficiency,
        })
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "energy {:.2}% | depin volume {:.2} | optimisation {:.2}% | traffic {:.2}%",
            self.avg_energy_efficiency,
            self.depin_volume,
            self.optimization_score,
            self.traffic_efficiency
        )
    }
}
