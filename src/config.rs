//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! speed = 2.0
//! seed = 42
//! base_period_ms = 1000
//! history_capacity = 20
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Slowest allowed speed factor.
pub const MIN_SPEED: f64 = 0.1;
/// Fastest allowed speed factor.
pub const MAX_SPEED: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial speed factor, in `[0.1, 5.0]`.
    pub speed: f64,
    /// Seed for the random source; entropy when absent.
    pub seed: Option<u64>,
    /// Tick period at speed 1.0, milliseconds.
    pub base_period_ms: u64,
    /// Retained performance samples.
    pub history_capacity: usize,
    /// Retained ledger transfer edges.
    pub edge_capacity: usize,
    /// Retained transaction records.
    pub record_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            seed: None,
            base_period_ms: 1000,
            history_capacity: 20,
            edge_capacity: 20,
            record_capacity: 20,
        }
    }
}

impl SimulationConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_speed(self.speed)?;
        if self.base_period_ms == 0 {
            return Err(SimError::InvalidConfig("base_period_ms must be positive".into()));
        }
        for (name, value) in [
            ("history_capacity", self.history_capacity),
            ("edge_capacity", self.edge_capacity),
            ("record_capacity", self.record_capacity),
        ] {
            if value == 0 {
                return Err(SimError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    pub fn base_period(&self) -> Duration {
        Duration::from_millis(self.base_period_ms)
    }

    /// Tick period at this config's speed.
    pub fn period(&self) -> Duration {
        tick_period(self.base_period(), self.speed)
    }
}

/// Accept a speed factor only if it is finite and within `[MIN_SPEED, MAX_SPEED]`.
pub fn check_speed(speed: f64) -> Result<f64> {
    if speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(SimError::SpeedOutOfRange(speed))
    }
}

/// `base / speed`, rounded to the nanosecond.
pub fn tick_period(base: Duration, speed: f64) -> Duration {
    Duration::from_nanos((base.as_nanos() as f64 / speed).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.period(), Duration::from_millis(1000));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = SimulationConfig::from_toml("speed = 2.0\nseed = 42\n").unwrap();
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.period(), Duration::from_millis(500));
    }

    #[test]
    fn speed_bounds() {
        assert!(check_speed(0.1).is_ok());
        assert!(check_speed(5.0).is_ok());
        assert!(matches!(check_speed(5.1), Err(SimError::SpeedOutOfRange(_))));
        assert!(check_speed(0.0).is_err());
        assert!(check_speed(f64::NAN).is_err());
    }

    #[test]
    fn speed_five_gives_200ms() {
        assert_eq!(
            tick_period(Duration::from_millis(1000), 5.0),
            Duration::from_millis(200)
        );
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = SimulationConfig::from_toml("record_capacity = 0").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(msg) if msg.contains("record_capacity")));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SimulationConfig::from_toml("speed = \"fast\"").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
