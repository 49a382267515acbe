//! Cooperative stop signal shared by every loop.
//!
//! A [`StopSignal`] carries a running flag and a wake channel. Loops check
//! [`is_running`](StopSignal::is_running) between units of work and sleep
//! through [`sleep`](StopSignal::sleep), which returns early as soon as
//! the signal is triggered. Triggering drops the only sender, so every
//! receiver blocked on the wake channel observes a disconnect at once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Why a simulation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run duration elapsed.
    Elapsed,
    /// No living entity remained.
    Extinct,
    /// `stop()` was called, or an external interrupt fired.
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elapsed => write!(f, "duration elapsed"),
            Self::Extinct => write!(f, "no entities left alive"),
            Self::Requested => write!(f, "stop requested"),
        }
    }
}

/// Running flag plus wake channel.
#[derive(Debug)]
pub struct StopSignal {
    running: AtomicBool,
    reason: OnceLock<StopReason>,
    wake_tx: Mutex<Option<Sender<()>>>,
    wake_rx: Receiver<()>,
}

impl StopSignal {
    /// A signal in the running state.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            running: AtomicBool::new(true),
            reason: OnceLock::new(),
            wake_tx: Mutex::new(Some(tx)),
            wake_rx: rx,
        }
    }

    /// Whether loops should keep going.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clear the running flag and wake all sleepers.
    ///
    /// Returns `true` for the call that actually stopped the signal; the
    /// first reason is the one that sticks.
    pub fn trigger(&self, reason: StopReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        self.running.store(false, Ordering::Release);
        self.wake_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if first {
            tracing::debug!(%reason, "stop signal triggered");
        }
        first
    }

    /// The reason recorded by the first trigger.
    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }

    /// Sleep up to `dur`. Returns `true` if the signal fired instead.
    pub fn sleep(&self, dur: Duration) -> bool {
        if !self.is_running() {
            return true;
        }
        match self.wake_rx.recv_timeout(dur) {
            Err(RecvTimeoutError::Timeout) => !self.is_running(),
            // Nothing is ever sent, so any other outcome is the disconnect.
            _ => true,
        }
    }

    /// Wake channel, disconnected once the signal fires. For `select!`.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.wake_rx
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle for stopping a simulation from outside its owner,
/// e.g. from an interrupt handler.
#[derive(Clone, Debug)]
pub struct StopHandle {
    signal: Arc<StopSignal>,
}

impl StopHandle {
    pub(crate) fn new(signal: Arc<StopSignal>) -> Self {
        Self { signal }
    }

    /// Ask every loop to stop. Returns immediately.
    pub fn stop(&self) {
        self.signal.trigger(StopReason::Requested);
    }

    /// Whether the simulation is still running.
    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_runs_full_duration_when_not_triggered() {
        let s = StopSignal::new();
        let start = Instant::now();
        assert!(!s.sleep(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn trigger_wakes_sleeper_early() {
        let s = Arc::new(StopSignal::new());
        let sleeper = {
            let s = Arc::clone(&s);
            thread::spawn(move || {
                let start = Instant::now();
                let stopped = s.sleep(Duration::from_secs(10));
                (stopped, start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        s.trigger(StopReason::Requested);
        let (stopped, waited) = sleeper.join().unwrap();
        assert!(stopped);
        assert!(waited < Duration::from_secs(2));
    }

    #[test]
    fn first_reason_wins() {
        let s = StopSignal::new();
        assert!(s.trigger(StopReason::Extinct));
        assert!(!s.trigger(StopReason::Requested));
        assert_eq!(s.reason(), Some(StopReason::Extinct));
        assert!(!s.is_running());
        assert!(s.sleep(Duration::from_secs(10)));
    }

    #[test]
    fn handle_stops_shared_signal() {
        let s = Arc::new(StopSignal::new());
        let h = StopHandle::new(Arc::clone(&s));
        assert!(h.is_running());
        h.clone().stop();
        assert!(!s.is_running());
        assert_eq!(s.reason(), Some(StopReason::Requested));
    }
}
