//! Run counters for the simulation engine.
//!
//! [`SimMetrics`] is shared by every loop and updated with relaxed
//! atomics; [`MetricsSnapshot`] is the plain copy handed to callers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, shared across threads.
#[derive(Debug, Default)]
pub struct SimMetrics {
    ticks: AtomicU64,
    moves: AtomicU64,
    tasks_enqueued: AtomicU64,
    fights: AtomicU64,
    kills: AtomicU64,
    stale_discarded: AtomicU64,
    ineligible_discarded: AtomicU64,
    observer_failures: AtomicU64,
    snapshots: AtomicU64,
}

/// Point-in-time copy of [`SimMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Completed movement ticks.
    pub ticks: u64,
    /// Committed steps.
    pub moves: u64,
    /// Combat tasks handed to the resolver.
    pub tasks_enqueued: u64,
    /// Contests actually rolled.
    pub fights: u64,
    /// Contests that killed the defender.
    pub kills: u64,
    /// Tasks discarded because a participant was already dead.
    pub stale_discarded: u64,
    /// Tasks discarded because the attacker could not target the defender.
    pub ineligible_discarded: u64,
    /// Failed or panicked observer deliveries.
    pub observer_failures: u64,
    /// Grid snapshots published.
    pub snapshots: u64,
}

macro_rules! counter {
    ($($inc:ident => $field:ident),* $(,)?) => {
        impl SimMetrics {
            $(
                pub(crate) fn $inc(&self, n: u64) {
                    self.$field.fetch_add(n, Ordering::Relaxed);
                }
            )*
        }
    };
}

counter! {
    add_ticks => ticks,
    add_moves => moves,
    add_tasks => tasks_enqueued,
    add_fights => fights,
    add_kills => kills,
    add_stale => stale_discarded,
    add_ineligible => ineligible_discarded,
    add_observer_failures => observer_failures,
    add_snapshots => snapshots,
}

impl SimMetrics {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contests rolled so far.
    pub fn fights(&self) -> u64 {
        self.fights.load(Ordering::Relaxed)
    }

    /// Copy every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            ticks: load(&self.ticks),
            moves: load(&self.moves),
            tasks_enqueued: load(&self.tasks_enqueued),
            fights: load(&self.fights),
            kills: load(&self.kills),
            stale_discarded: load(&self.stale_discarded),
            ineligible_discarded: load(&self.ineligible_discarded),
            observer_failures: load(&self.observer_failures),
            snapshots: load(&self.snapshots),
        }
    }
}
