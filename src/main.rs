//! Quantum smart-city DePIN simulator: command-line driver.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;

use quantum_smart_city_sim::prelude::*;

#[derive(Parser)]
#[command(name = "smart-city-sim")]
#[command(about = "Run the quantum smart-city DePIN state engine and report its state")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "SMART_CITY_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for the random source (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Speed factor in [0.1, 5.0] (overrides config)
    #[arg(long)]
    speed: Option<f64>,

    /// Run this many ticks synchronously, without the timer
    #[arg(long, conflicts_with = "seconds")]
    ticks: Option<u64>,

    /// Run the real clock for this many seconds
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Print the final snapshot as JSON instead of the report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    config.validate()?;

    let run_for = Duration::try_from_secs_f64(cli.seconds).map_err(|e| {
        format!("--seconds must be a non-negative number of seconds, got {}: {}", cli.seconds, e)
    })?;

    let snapshot = match cli.ticks {
        Some(n) => run_synchronous(&config, n),
        None => run_clock(&config, run_for)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_report(&snapshot);
    }
    Ok(())
}

fn run_synchronous(config: &SimulationConfig, ticks: u64) -> Snapshot {
    let mut source = match config.seed {
        Some(seed) => SeededSource::from_seed(seed),
        None => SeededSource::from_entropy(),
    };
    let mut state = CityState::new(config);
    for _ in 0..ticks {
        state.tick(&mut source, config.speed);
    }
    state.snapshot(ClockInfo::idle(config.speed))
}

fn run_clock(config: &SimulationConfig, run_for: Duration) -> Result<Snapshot, SimError> {
    let clock = SimulationClock::new(config.clone())?;
    log::info!("running clock for {:?} at period {:?}", run_for, clock.period());
    clock.start()?;
    thread::sleep(run_for);
    clock.stop()?;
    Ok(clock.snapshot().as_ref().clone())
}

fn print_report(s: &Snapshot) {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║          QUANTUM SMART CITY DePIN: STATE ENGINE REPORT           ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Ticks run:          {}", s.tick);
    println!("  Speed:              {:.1}x", s.clock.speed);
    println!("  Dashboard:          {}", s.dashboard());
    println!();

    println!("━━━ Quantum register ━━━");
    let bits: String = s
        .quantum_bits
        .iter()
        .map(|&b| if b { '1' } else { '0' })
        .collect();
    println!("  |{}⟩", bits);
    println!();

    println!("━━━ DePIN network ━━━");
    for row in s.depin_nodes.chunks(3) {
        let cells: Vec<String> = row
            .iter()
            .map(|n| format!("{}{:>6.2}", if n.active { '●' } else { '○' }, n.transaction_volume))
            .collect();
        println!("  {}", cells.join("  "));
    }
    println!("  Total volume:       {:.2}", s.depin_volume());
    println!();

    println!("━━━ City portfolio ━━━");
    println!("  Optimisation score: {:.4}", s.optimization_score);
    println!("  Energy-flow phase:  {:.3}", s.energy_phase);
    for row in s.building_efficiencies.chunks(3) {
        let cells: Vec<String> = row.iter().map(|e| format!("{:.4}", e)).collect();
        println!("  {}", cells.join("  "));
    }
    println!("  Infrastructure:     {:.4}", s.infrastructure_efficiency);
    println!("  Traffic:            {:.4}", s.traffic_efficiency);
    println!();

    println!("━━━ Ledger ━━━");
    println!("  Transfer edges:     {}", s.transfer_edges.len());
    let graph = TransactionGraph::from_records(&s.transactions);
    println!(
        "  Records:            {} across {} peers",
        s.transactions.len(),
        graph.nodes.len()
    );
    println!("  {:<13}  {:>7}  {:>7}  {:>6}  {}", "hash", "from", "to", "amount", "status");
    for r in s.transactions.iter().take(5) {
        println!(
            "  {:<13}  {:>7}  {:>7}  {:>6.2}  {}",
            r.hash, r.from, r.to, r.amount, r.status
        );
    }
    println!();

    println!("━━━ Performance history ━━━");
    println!("  Retained:           {} of {} samples", s.history.len(), s.history_capacity);
    println!(
        "  {:>4}  {:>10}  {:>10}  {:>10}  {:>10}",
        "step", "energy %", "depin vol", "optim %", "traffic %"
    );
    println!("  {:─>4}  {:─>10}  {:─>10}  {:─>10}  {:─>10}", "", "", "", "", "");
    for p in &s.history {
        println!(
            "  {:>4}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
            p.step, p.avg_energy_efficiency, p.depin_volume, p.optimization_score, p.traffic_efficiency
        );
    }
}
