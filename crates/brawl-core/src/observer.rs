//! Observer capability and the registration-ordered [`ObserverSet`].
//!
//! Delivery is synchronous and best-effort. A sink that returns an error
//! or panics is logged and skipped; the remaining sinks still receive the
//! event and the calling loop carries on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ObserverError;

/// A notification emitted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A validated contest finished.
    Fight {
        /// Attacker name.
        attacker: String,
        /// Defender name.
        defender: String,
        /// Whether the defender was killed.
        defender_died: bool,
    },
    /// An entity committed a step.
    Move {
        /// Entity name.
        name: String,
        /// New x coordinate.
        x: f64,
        /// New y coordinate.
        y: f64,
    },
    /// An entity died.
    Die {
        /// Entity name.
        name: String,
    },
}

/// External notification sink.
pub trait Observer: Send + Sync {
    /// A contest between `attacker` and `defender` was resolved.
    fn on_fight(
        &self,
        attacker: &str,
        defender: &str,
        defender_died: bool,
    ) -> Result<(), ObserverError>;

    /// `name` moved to `(x, y)`. Ignored unless overridden.
    fn on_move(&self, name: &str, x: f64, y: f64) -> Result<(), ObserverError> {
        let _ = (name, x, y);
        Ok(())
    }

    /// `name` died.
    fn on_die(&self, name: &str) -> Result<(), ObserverError>;
}

/// Route one event to the matching observer method.
pub fn dispatch(observer: &dyn Observer, event: &Event) -> Result<(), ObserverError> {
    match event {
        Event::Fight {
            attacker,
            defender,
            defender_died,
        } => observer.on_fight(attacker, defender, *defender_died),
        Event::Move { name, x, y } => observer.on_move(name, *x, *y),
        Event::Die { name } => observer.on_die(name),
    }
}

/// Observers in registration order.
#[derive(Default)]
pub struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn Observer>>>,
}

impl ObserverSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer after all previously registered ones.
    pub fn add(&self, observer: Arc<dyn Observer>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every observer in registration order.
    ///
    /// Returns the number of observers that failed.
    pub fn emit(&self, event: &Event) -> usize {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut failures = 0;
        for (slot, observer) in observers.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| dispatch(&**observer, event)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failures += 1;
                    tracing::warn!(
                        observer = slot,
                        error = %err,
                        "observer failed; event dropped for this sink"
                    );
                }
                Err(_) => {
                    failures += 1;
                    tracing::warn!(
                        observer = slot,
                        "observer panicked; event dropped for this sink"
                    );
                }
            }
        }
        failures
    }

    /// Deliver a sequence of events, preserving their order.
    ///
    /// Returns the total number of failed deliveries.
    pub fn emit_all<'a>(&self, events: impl IntoIterator<Item = &'a Event>) -> usize {
        events.into_iter().map(|e| self.emit(e)).sum()
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.len())
            .finish()
    }
}
