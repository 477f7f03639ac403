//! Background clock thread that owns the city state.
//!
//! The worker thread is the only place the state is mutated. It waits on two
//! channels at once: control commands from the [`SimulationClock`] handle and
//! a periodic ticker that exists only while the clock is running. Every
//! command is acknowledged after it has been applied, so when `stop()` or
//! `reset()` returns the ticker is already gone and no further tick can fire.
//!
//! Readers never see a partially updated tick: the worker publishes a fresh
//! `Arc<Snapshot>` after each tick and each command, available through
//! [`SimulationClock::snapshot`] and pushed to every [`SimulationClock::subscribe`]r.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::config::{check_speed, tick_period, SimulationConfig};
use crate::error::{Result, SimError};
use crate::random::{RandomSource, SeededSource};
use crate::state::{CityState, ClockInfo, ClockStatus, Snapshot};

/// Snapshots buffered per subscriber before frames are skipped.
const SUBSCRIBER_BUFFER: usize = 16;

enum Op {
    Start,
    Stop,
    Reset,
    SetSpeed(f64),
    Shutdown,
}

struct Command {
    op: Op,
    ack: Sender<()>,
}

/// State shared between the handle and the worker.
struct Published {
    latest: RwLock<Arc<Snapshot>>,
    subscribers: Mutex<Vec<Sender<Arc<Snapshot>>>>,
}

/// Handle to the clock thread.
pub struct SimulationClock {
    commands: Sender<Command>,
    published: Arc<Published>,
    base_period: Duration,
    worker: Option<JoinHandle<()>>,
}

impl SimulationClock {
    /// Spawn an idle clock. Uses the configured seed, or entropy without one.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let source: Box<dyn RandomSource + Send> = match config.seed {
            Some(seed) => Box::new(SeededSource::from_seed(seed)),
            None => Box::new(SeededSource::from_entropy()),
        };
        Self::with_source(config, source)
    }

    /// Spawn an idle clock drawing from the given random source.
    pub fn with_source(
        config: SimulationConfig,
        source: Box<dyn RandomSource + Send>,
    ) -> Result<Self> {
        config.validate()?;

        let state = CityState::new(&config);
        let published = Arc::new(Published {
            latest: RwLock::new(Arc::new(state.snapshot(ClockInfo::idle(config.speed)))),
            subscribers: Mutex::new(Vec::new()),
        });
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();

        let worker = Worker {
            state,
            source,
            speed: config.speed,
            base_period: config.base_period(),
            ticker: None,
            published: Arc::clone(&published),
        };
        let handle = thread::Builder::new()
            .name("city-clock".into())
            .spawn(move || worker.run(cmd_rx))
            .map_err(SimError::WorkerSpawn)?;

        Ok(SimulationClock {
            commands: cmd_tx,
            published,
            base_period: config.base_period(),
            worker: Some(handle),
        })
    }

    /// Begin periodic ticking. No-op when already running.
    pub fn start(&self) -> Result<()> {
        self.send(Op::Start)
    }

    /// Halt ticking, keeping all state.
    pub fn stop(&self) -> Result<()> {
        self.send(Op::Stop)
    }

    /// Halt ticking and restore every subsystem to its initial value.
    /// The speed factor is kept.
    pub fn reset(&self) -> Result<()> {
        self.send(Op::Reset)
    }

    /// Change the speed factor. A running clock restarts its ticker at the
    /// new period; no state is lost.
    pub fn set_speed(&self, speed: f64) -> Result<()> {
        let speed = check_speed(speed).map_err(|e| {
            log::warn!("rejected speed change: {}", e);
            e
        })?;
        self.send(Op::SetSpeed(speed))
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self
            .published
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Receive every snapshot published from now on. A subscriber that falls
    /// more than a few snapshots behind misses frames rather than blocking
    /// the clock.
    pub fn subscribe(&self) -> Receiver<Arc<Snapshot>> {
        let (tx, rx) = crossbeam_channel::bounded(SUBSCRIBER_BUFFER);
        self.published
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn status(&self) -> ClockStatus {
        self.snapshot().clock.status
    }

    pub fn speed(&self) -> f64 {
        self.snapshot().clock.speed
    }

    /// Tick period at the current speed.
    pub fn period(&self) -> Duration {
        tick_period(self.base_period, self.speed())
    }

    fn send(&self, op: Op) -> Result<()> {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        self.commands
            .send(Command { op, ack: ack_tx })
            .map_err(|_| SimError::ClockStopped)?;
        ack_rx.recv().map_err(|_| SimError::ClockStopped)
    }
}

impl Drop for SimulationClock {
    fn drop(&mut self) {
        let _ = self.send(Op::Shutdown);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("clock worker panicked");
            }
        }
    }
}

struct Worker {
    state: CityState,
    source: Box<dyn RandomSource + Send>,
    speed: f64,
    base_period: Duration,
    ticker: Option<Receiver<Instant>>,
    published: Arc<Published>,
}

impl Worker {
    fn run(mut self, commands: Receiver<Command>) {
        loop {
            let ticks = self
                .ticker
                .clone()
                .unwrap_or_else(crossbeam_channel::never);

            crossbeam_channel::select! {
                recv(commands) -> msg => {
                    let Ok(Command { op, ack }) = msg else {
                        break;
                    };
                    let keep_running = self.apply(op);
                    self.publish();
                    let _ = ack.send(());
                    if !keep_running {
                        break;
                    }
                }
                recv(ticks) -> _ => {
                    self.state.tick(self.source.as_mut(), self.speed);
                    self.publish();
                }
            }
        }
        log::debug!("clock worker exiting after {} ticks", self.state.ticks());
    }

    /// Returns `false` on shutdown.
    fn apply(&mut self, op: Op) -> bool {
        match op {
            Op::Start => {
                if self.ticker.is_none() {
                    self.ticker = Some(crossbeam_channel::tick(self.period()));
                    log::info!("clock started, period {:?}", self.period());
                }
            }
            Op::Stop => {
                if self.ticker.take().is_some() {
                    log::info!("clock stopped at tick {}", self.state.ticks());
                }
            }
            Op::Reset => {
                self.ticker = None;
                self.state.reset();
                log::info!("simulation reset");
            }
            Op::SetSpeed(speed) => {
                self.speed = speed;
                if self.ticker.is_some() {
                    // release the old timer before installing the new one
                    self.ticker = None;
                    self.ticker = Some(crossbeam_channel::tick(self.period()));
                }
                log::info!("speed set to {:.1}x, period {:?}", speed, self.period());
            }
            Op::Shutdown => return false,
        }
        true
    }

    fn period(&self) -> Duration {
        tick_period(self.base_period, self.speed)
    }

    fn clock_info(&self) -> ClockInfo {
        ClockInfo {
            status: if self.ticker.is_some() {
                ClockStatus::Running
            } else {
                ClockStatus::Idle
            },
            speed: self.speed,
        }
    }

    fn publish(&self) {
        let snapshot = Arc::new(self.state.snapshot(self.clock_info()));
        *self
            .published
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);

        let mut subscribers = self
            .published
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| match tx.try_send(Arc::clone(&snapshot)) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}
