//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the builder input for a [`Simulation`](crate::Simulation).
//! [`validate()`](SimConfig::validate) checks structural invariants at
//! startup; nothing is re-validated while the loops run.

use std::time::Duration;

use thiserror::Error;

// ── ScanWindow ─────────────────────────────────────────────────────

/// Which entities an attacker is compared against during detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanWindow {
    /// Every entity in the registry.
    Full,
    /// Only the first `n` entities in registry order.
    ///
    /// Bounds per-tick cost, but also means only those `n` entities can
    /// ever be detected as targets.
    Prefix(usize),
}

impl ScanWindow {
    /// Number of leading registry slots to scan for a population of `len`.
    pub fn limit(self, len: usize) -> usize {
        match self {
            Self::Full => len,
            Self::Prefix(n) => n.min(len),
        }
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Tunables for one simulation run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Random entities seeded at `start()`, after any supplied ones. Default: 50.
    pub population: usize,
    /// Sleep between movement ticks. Default: 200 ms.
    pub tick_interval: Duration,
    /// Upper bound on one combat-queue wait. Default: 100 ms.
    pub dequeue_timeout: Duration,
    /// Supervisor poll interval. Default: 100 ms.
    pub supervisor_interval: Duration,
    /// Snapshot cadence; the first snapshot is immediate. Default: 3 s.
    pub snapshot_every: Duration,
    /// Wall-clock run length before the supervisor stops. Default: 30 s.
    pub duration: Duration,
    /// Detection scan window. Default: [`ScanWindow::Full`].
    pub scan_window: ScanWindow,
    /// Move living entities in a freshly shuffled order each tick. Default: true.
    pub shuffle_movement: bool,
    /// Grid snapshot resolution (cells per axis). Default: 10.
    pub grid_cells: usize,
    /// Master seed. `None` draws every RNG from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: 50,
            tick_interval: Duration::from_millis(200),
            dequeue_timeout: Duration::from_millis(100),
            supervisor_interval: Duration::from_millis(100),
            snapshot_every: Duration::from_secs(3),
            duration: Duration::from_secs(30),
            scan_window: ScanWindow::Full,
            shuffle_movement: true,
            grid_cells: 10,
            seed: None,
        }
    }
}

/// Independent RNG streams derived from the master seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SeedStream {
    Factory = 1,
    Movement = 2,
    Dice = 3,
}

impl SimConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("tick_interval", self.tick_interval),
            ("dequeue_timeout", self.dequeue_timeout),
            ("supervisor_interval", self.supervisor_interval),
            ("snapshot_every", self.snapshot_every),
            ("duration", self.duration),
        ];
        for (name, value) in intervals {
            if value.is_zero() {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        if self.scan_window == ScanWindow::Prefix(0) {
            return Err(ConfigError::EmptyScanWindow);
        }
        if !(1..=100).contains(&self.grid_cells) {
            return Err(ConfigError::InvalidGrid {
                cells: self.grid_cells,
            });
        }
        Ok(())
    }

    /// Seed for one RNG stream, if a master seed is set.
    pub(crate) fn stream_seed(&self, stream: SeedStream) -> Option<u64> {
        self.seed
            .map(|s| s ^ (stream as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A duration that drives a loop is zero.
    #[error("{name} must be non-zero")]
    ZeroInterval {
        /// Name of the offending field.
        name: &'static str,
    },
    /// `ScanWindow::Prefix(0)` would never detect anything.
    #[error("scan window prefix must be at least 1")]
    EmptyScanWindow,
    /// Grid resolution outside `1..=100`.
    #[error("grid_cells {cells} must be between 1 and 100")]
    InvalidGrid {
        /// The configured resolution.
        cells: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = SimConfig {
            dequeue_timeout: Duration::ZERO,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroInterval {
                name: "dequeue_timeout"
            })
        );
    }

    #[test]
    fn empty_prefix_rejected() {
        let cfg = SimConfig {
            scan_window: ScanWindow::Prefix(0),
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyScanWindow));
    }

    #[test]
    fn grid_bounds_checked() {
        for cells in [0, 101] {
            let cfg = SimConfig {
                grid_cells: cells,
                ..SimConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidGrid { cells }));
        }
    }

    #[test]
    fn scan_window_limits() {
        assert_eq!(ScanWindow::Full.limit(7), 7);
        assert_eq!(ScanWindow::Prefix(10).limit(7), 7);
        assert_eq!(ScanWindow::Prefix(3).limit(7), 3);
    }

    #[test]
    fn streams_differ_and_are_stable() {
        let cfg = SimConfig {
            seed: Some(42),
            ..SimConfig::default()
        };
        let a = cfg.stream_seed(SeedStream::Movement);
        let b = cfg.stream_seed(SeedStream::Dice);
        assert_ne!(a, b);
        assert_eq!(a, cfg.stream_seed(SeedStream::Movement));
        assert_eq!(SimConfig::default().stream_seed(SeedStream::Factory), None);
    }
}
