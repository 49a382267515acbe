//! User-facing [`Simulation`] API and lifecycle state machine.
//!
//! # Architecture
//!
//! ```text
//! Caller                Movement thread        Resolver thread        Supervisor thread
//!   |                        |                       |                       |
//!   |--start()-------------->| sleep(tick)           |                       |
//!   |                        | registry.write:       |                       |
//!   |                        |   step + detect       |                       |
//!   |                        | emit Move             |                       |
//!   |                        |--CombatTask---------->| select!(task, stop,   |
//!   |                        |  [unbounded channel]  |         timeout)      |
//!   |                        |                       | registry.write:       |
//!   |                        |                       |   check, roll, kill   |
//!   |                        |                       | emit Fight / Die      |
//!   |                        |                       |                       | snapshot every N s
//!   |                        |                       |                       | duration / extinction
//!   |                        |<======== StopSignal::trigger() ===============|
//!   |--stop()---> trigger(Requested), join all three, Stopped                |
//! ```
//!
//! Lifecycle: `Idle → Running → Stopping → Stopped`. A simulation is
//! started at most once; the population is stable after start.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use brawl_core::{Dice, Entity, EntityFactory, Observer, ObserverSet, RandomDice};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::config::{ConfigError, SeedStream, SimConfig};
use crate::metrics::{MetricsSnapshot, SimMetrics};
use crate::queue::combat_queue;
use crate::registry::Registry;
use crate::resolver::CombatResolver;
use crate::snapshot::{GridSnapshot, SnapshotSink};
use crate::stop::{StopHandle, StopReason, StopSignal};
use crate::workers::{run_resolver, MovementLoop, Supervisor};

// ── Error types ──────────────────────────────────────────────────

/// Startup failures. Nothing after a successful `start()` is fatal.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn {name} thread")]
    ThreadSpawnFailed {
        /// Thread name.
        name: &'static str,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

// ── StopReport ───────────────────────────────────────────────────

/// Report from [`Simulation::stop`].
#[derive(Clone, Debug)]
pub struct StopReport {
    /// What ended the run.
    pub reason: StopReason,
    /// Time spent in the stop sequence.
    pub total_ms: u64,
    /// Worker threads joined cleanly by this call.
    pub threads_joined: usize,
    /// Worker threads that had panicked.
    pub threads_panicked: usize,
    /// Counters at the time of the stop.
    pub metrics: MetricsSnapshot,
}

// ── SimState ─────────────────────────────────────────────────────

/// Lifecycle state of a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    /// Built, not started.
    Idle,
    /// Loops are running.
    Running,
    /// A stop was triggered; loops may still be winding down.
    Stopping,
    /// Every loop has exited.
    Stopped,
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

// ── SimulationBuilder ────────────────────────────────────────────

/// Builder for [`Simulation`].
#[derive(Default)]
pub struct SimulationBuilder {
    config: SimConfig,
    observers: Vec<Arc<dyn Observer>>,
    sinks: Vec<Arc<dyn SnapshotSink>>,
    dice: Option<Box<dyn Dice>>,
    entities: Vec<Entity>,
}

impl SimulationBuilder {
    /// Replace the configuration.
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an observer. Delivery follows registration order.
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Register a snapshot sink.
    pub fn snapshot_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Use `dice` for contests instead of [`RandomDice`].
    pub fn dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    /// Add an entity ahead of the random population.
    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add several entities ahead of the random population.
    pub fn entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Build an idle simulation. Out-of-bounds entities are dropped.
    pub fn build(self) -> Simulation {
        let registry = Arc::new(Registry::new());
        for entity in self.entities {
            registry.push(entity);
        }
        let observers = Arc::new(ObserverSet::new());
        for observer in self.observers {
            observers.add(observer);
        }
        Simulation {
            config: self.config,
            registry,
            observers,
            sinks: self.sinks,
            dice: self.dice,
            metrics: Arc::new(SimMetrics::new()),
            stop: Arc::new(StopSignal::new()),
            latest: Arc::new(Mutex::new(None)),
            threads: Vec::new(),
            state: SimState::Idle,
            started: None,
        }
    }
}

// ── Simulation ───────────────────────────────────────────────────

/// Concurrent combat simulation.
///
/// Runs movement/detection, combat resolution and supervision on three
/// background threads. Worker loops only see the shared state and the
/// stop signal, never the `Simulation` itself, so no loop can join
/// itself.
pub struct Simulation {
    config: SimConfig,
    registry: Arc<Registry>,
    observers: Arc<ObserverSet>,
    sinks: Vec<Arc<dyn SnapshotSink>>,
    dice: Option<Box<dyn Dice>>,
    metrics: Arc<SimMetrics>,
    stop: Arc<StopSignal>,
    latest: Arc<Mutex<Option<GridSnapshot>>>,
    threads: Vec<JoinHandle<()>>,
    state: SimState,
    started: Option<Instant>,
}

impl Simulation {
    /// Start building a simulation.
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::default()
    }

    /// Current lifecycle state.
    ///
    /// Reports `Stopping` as soon as any loop or handle triggers a stop,
    /// even before `stop()` joins the threads.
    pub fn state(&self) -> SimState {
        match self.state {
            SimState::Running if !self.stop.is_running() => SimState::Stopping,
            s => s,
        }
    }

    /// Seed the population and launch the loops.
    ///
    /// Only acts from `Idle`; any other state is a no-op.
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.state != SimState::Idle {
            tracing::info!(state = %self.state, "start ignored");
            return Ok(());
        }
        self.config.validate()?;

        let mut factory = match self.config.stream_seed(SeedStream::Factory) {
            Some(seed) => EntityFactory::new(seed),
            None => EntityFactory::from_entropy(),
        };
        for _ in 0..self.config.population {
            self.registry.push(factory.create_random_in_world());
        }
        tracing::info!(
            population = self.registry.len(),
            seeded = self.config.population,
            "population seeded"
        );

        let dice: Box<dyn Dice> = match self.dice.take() {
            Some(dice) => dice,
            None => Box::new(match self.config.stream_seed(SeedStream::Dice) {
                Some(seed) => RandomDice::new(seed),
                None => RandomDice::from_entropy(),
            }),
        };
        let rng = match self.config.stream_seed(SeedStream::Movement) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        let started = Instant::now();
        self.started = Some(started);
        self.state = SimState::Running;

        let (task_tx, task_rx) = combat_queue();

        let resolver = CombatResolver::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.observers),
            Arc::clone(&self.metrics),
            dice,
        );
        let stop = Arc::clone(&self.stop);
        let timeout = self.config.dequeue_timeout;
        self.spawn("brawl-resolver", move || {
            run_resolver(resolver, task_rx, stop, timeout)
        })?;

        let movement = MovementLoop {
            registry: Arc::clone(&self.registry),
            observers: Arc::clone(&self.observers),
            metrics: Arc::clone(&self.metrics),
            stop: Arc::clone(&self.stop),
            queue: task_tx,
            rng,
            tick_interval: self.config.tick_interval,
            scan_window: self.config.scan_window,
            shuffle: self.config.shuffle_movement,
        };
        self.spawn("brawl-movement", move || movement.run())?;

        let supervisor = Supervisor {
            registry: Arc::clone(&self.registry),
            metrics: Arc::clone(&self.metrics),
            stop: Arc::clone(&self.stop),
            sinks: self.sinks.clone(),
            latest: Arc::clone(&self.latest),
            started,
            poll: self.config.supervisor_interval,
            snapshot_every: self.config.snapshot_every,
            duration: self.config.duration,
            grid_cells: self.config.grid_cells,
        };
        self.spawn("brawl-supervisor", move || supervisor.run())?;

        tracing::info!(
            duration_ms = self.config.duration.as_millis() as u64,
            scan_window = ?self.config.scan_window,
            "simulation started"
        );
        Ok(())
    }

    /// Spawn one named worker. On failure, unwinds whatever already started.
    fn spawn<F>(&mut self, name: &'static str, f: F) -> Result<(), SimError>
    where
        F: FnOnce() + Send + 'static,
    {
        match thread::Builder::new().name(name.into()).spawn(f) {
            Ok(handle) => {
                self.threads.push(handle);
                Ok(())
            }
            Err(source) => {
                tracing::error!(thread = name, error = %source, "thread spawn failed");
                self.stop();
                Err(SimError::ThreadSpawnFailed { name, source })
            }
        }
    }

    /// Block until a stop has been triggered or `timeout` elapses.
    ///
    /// Returns `true` if the simulation is stopping or stopped.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.stop.sleep(timeout)
    }

    /// Handle for requesting a stop from elsewhere, e.g. an interrupt
    /// handler. Joining still happens in [`stop`](Self::stop).
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.stop))
    }

    /// Stop every loop and wait for all of them to exit.
    ///
    /// Idempotent: later calls return immediately with nothing joined.
    pub fn stop(&mut self) -> StopReport {
        let start = Instant::now();
        self.stop.trigger(StopReason::Requested);
        let reason = self.stop.reason().unwrap_or(StopReason::Requested);

        if self.state != SimState::Running {
            self.state = SimState::Stopped;
            return StopReport {
                reason,
                total_ms: 0,
                threads_joined: 0,
                threads_panicked: 0,
                metrics: self.metrics.snapshot(),
            };
        }

        self.state = SimState::Stopping;
        let mut threads_joined = 0;
        let mut threads_panicked = 0;
        for handle in self.threads.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            match handle.join() {
                Ok(()) => threads_joined += 1,
                Err(_) => {
                    threads_panicked += 1;
                    tracing::error!(thread = name.as_str(), "worker thread panicked");
                }
            }
        }
        self.state = SimState::Stopped;

        let report = StopReport {
            reason,
            total_ms: start.elapsed().as_millis() as u64,
            threads_joined,
            threads_panicked,
            metrics: self.metrics.snapshot(),
        };
        tracing::info!(
            %reason,
            ran_ms = self.started.map_or(0, |s| s.elapsed().as_millis() as u64),
            total_ms = report.total_ms,
            threads_joined,
            threads_panicked,
            fights = report.metrics.fights,
            kills = report.metrics.kills,
            alive = self.registry.alive_count(),
            "simulation stopped"
        );
        report
    }

    /// The most recently published grid snapshot.
    pub fn latest_snapshot(&self) -> Option<GridSnapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Shared entity registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Current counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Contests rolled so far.
    pub fn fights(&self) -> u64 {
        self.metrics.fights()
    }

    /// Active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if self.state == SimState::Running {
            self.stop();
        }
    }
}
