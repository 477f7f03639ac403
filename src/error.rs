//! Errors from the clock control surface and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{MAX_SPEED, MIN_SPEED};

pub type Result<T> = std::result::Result<T, SimError>;

/// Failures on the control surface and while loading configuration.
///
/// Subsystem updates themselves cannot fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("speed factor {0} is outside [{min}, {max}]", min = MIN_SPEED, max = MAX_SPEED)]
    SpeedOutOfRange(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to spawn clock worker")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("simulation clock worker has stopped")]
    ClockStopped,
}
