//! Loading engine configuration from disk.

use std::io::Write;

use quantum_smart_city_sim::prelude::*;

#[test]
fn loads_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "speed = 2.5\nseed = 9\nhistory_capacity = 5").unwrap();

    let config = SimulationConfig::load(file.path()).unwrap();
    assert_eq!(config.speed, 2.5);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.history_capacity, 5);
    assert_eq!(config.edge_capacity, 20);
}

#[test]
fn history_capacity_from_config_is_honoured() {
    let config = SimulationConfig::from_toml("history_capacity = 5\nseed = 1").unwrap();
    let mut state = CityState::new(&config);
    let mut src = SeededSource::from_seed(1);
    for _ in 0..12 {
        state.tick(&mut src, config.speed);
    }
    let steps: Vec<u64> = state.history().samples().map(|s| s.step).collect();
    assert_eq!(steps, vec![8, 9, 10, 11, 12]);
}

#[test]
fn missing_file_reports_path() {
    let err = SimulationConfig::load("/nonexistent/smart-city.toml").unwrap_err();
    match err {
        SimError::ConfigRead { path, .. } => {
            assert!(path.ends_with("smart-city.toml"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn out_of_range_speed_in_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "speed = 12.0").unwrap();
    assert!(matches!(
        SimulationConfig::load(file.path()),
        Err(SimError::SpeedOutOfRange(s)) if s == 12.0
    ));
}
