//! The three long-lived loops driven by [`Simulation`](crate::Simulation).
//!
//! Each loop owns its own state (RNG, dice, channel half) and shares the
//! registry, observers, metrics and stop signal by `Arc`. None of them
//! can stop or join another loop; they only trigger the [`StopSignal`].
//!
//! Lock discipline: registry sections never call observers or touch the
//! combat queue. Work is collected under the lock and published after it
//! is released.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use brawl_core::{Dice, Event, ObserverSet};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::ScanWindow;
use crate::detector::{detect, CombatTask};
use crate::metrics::SimMetrics;
use crate::queue::{Dequeue, TaskReceiver, TaskSender};
use crate::registry::Registry;
use crate::resolver::CombatResolver;
use crate::snapshot::{GridSnapshot, SnapshotSink};
use crate::stop::{StopReason, StopSignal};

// ── Movement / detection ─────────────────────────────────────────

/// State owned by the movement thread.
pub(crate) struct MovementLoop {
    pub registry: Arc<Registry>,
    pub observers: Arc<ObserverSet>,
    pub metrics: Arc<SimMetrics>,
    pub stop: Arc<StopSignal>,
    pub queue: TaskSender,
    pub rng: ChaCha8Rng,
    pub tick_interval: Duration,
    pub scan_window: ScanWindow,
    pub shuffle: bool,
}

impl MovementLoop {
    pub fn run(mut self) {
        tracing::debug!("movement loop started");
        while !self.stop.sleep(self.tick_interval) {
            if self.tick() {
                self.metrics.add_ticks(1);
            }
        }
        tracing::debug!("movement loop exited");
    }

    /// One pass over the living population. Returns `false` if the stop
    /// signal cut the pass short.
    fn tick(&mut self) -> bool {
        let mut ids = self.registry.living_ids();
        if self.shuffle {
            ids.shuffle(&mut self.rng);
        }

        for id in ids {
            if !self.stop.is_running() {
                return false;
            }
            let rng = &mut self.rng;
            let window = self.scan_window;
            let (moved, tasks) = self.registry.write(|entities| {
                let Some(entity) = entities.get_mut(id.index()) else {
                    return (None, Vec::new());
                };
                let moved = entity.step(rng).then(|| Event::Move {
                    name: entity.name().to_string(),
                    x: entity.x(),
                    y: entity.y(),
                });
                (moved, detect(entities, id, window))
            });

            if let Some(event) = moved {
                if let Event::Move { name, x, y } = &event {
                    tracing::trace!(%id, name = name.as_str(), x, y, "moved");
                }
                self.metrics.add_moves(1);
                let failures = self.observers.emit(&event);
                if failures > 0 {
                    self.metrics.add_observer_failures(failures as u64);
                }
            }
            self.enqueue(tasks);
        }
        true
    }

    fn enqueue(&self, tasks: Vec<CombatTask>) {
        if tasks.is_empty() {
            return;
        }
        self.metrics.add_tasks(tasks.len() as u64);
        for task in tasks {
            self.queue.enqueue(task);
        }
    }
}

// ── Combat resolution ────────────────────────────────────────────

/// Drain the combat queue until the stop signal fires.
///
/// Tasks still queued at that point are dropped with the receiver.
pub(crate) fn run_resolver<D: Dice>(
    mut resolver: CombatResolver<D>,
    rx: TaskReceiver,
    stop: Arc<StopSignal>,
    timeout: Duration,
) {
    tracing::debug!("resolver loop started");
    loop {
        match rx.next(&stop, timeout) {
            Dequeue::Task(task) => {
                resolver.resolve(task);
            }
            Dequeue::TimedOut => {}
            Dequeue::Stopped => break,
        }
    }
    let abandoned = rx.len();
    if abandoned > 0 {
        tracing::debug!(abandoned, "resolver exiting with queued tasks");
    }
    tracing::debug!("resolver loop exited");
}

// ── Supervisor ───────────────────────────────────────────────────

/// State owned by the supervisor thread.
pub(crate) struct Supervisor {
    pub registry: Arc<Registry>,
    pub metrics: Arc<SimMetrics>,
    pub stop: Arc<StopSignal>,
    pub sinks: Vec<Arc<dyn SnapshotSink>>,
    pub latest: Arc<Mutex<Option<GridSnapshot>>>,
    pub started: Instant,
    pub poll: Duration,
    pub snapshot_every: Duration,
    pub duration: Duration,
    pub grid_cells: usize,
}

impl Supervisor {
    pub fn run(self) {
        tracing::debug!("supervisor loop started");
        let mut last_slot: Option<u128> = None;
        loop {
            let elapsed = self.started.elapsed();
            let slot = elapsed.as_nanos() / self.snapshot_every.as_nanos();
            if last_slot != Some(slot) {
                last_slot = Some(slot);
                self.publish(elapsed);
            }

            if elapsed >= self.duration {
                if self.stop.trigger(StopReason::Elapsed) {
                    tracing::info!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        "run duration elapsed"
                    );
                }
                break;
            }
            if self.registry.alive_count() == 0 {
                if self.stop.trigger(StopReason::Extinct) {
                    tracing::info!("no entities left alive");
                }
                break;
            }
            if self.stop.sleep(self.poll) {
                break;
            }
        }
        tracing::debug!("supervisor loop exited");
    }

    fn publish(&self, elapsed: Duration) {
        let snapshot = self.registry.read(|entities| {
            GridSnapshot::capture(entities, self.grid_cells, self.metrics.fights(), elapsed)
        });
        for sink in &self.sinks {
            if panic::catch_unwind(AssertUnwindSafe(|| sink.publish(&snapshot))).is_err() {
                tracing::warn!("snapshot sink panicked; snapshot dropped for this sink");
            }
        }
        self.metrics.add_snapshots(1);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}
