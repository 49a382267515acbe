//! Concurrent simulation engine for brawl.
//!
//! Owns the shared entity [`Registry`], detects proximity encounters,
//! serializes combat through a FIFO queue, and drives the three worker
//! loops of a [`Simulation`]:
//!
//! - movement/detection: steps every living entity each tick and
//!   enqueues a [`CombatTask`] for every entity within reach;
//! - combat resolution: drains the queue and applies each task through
//!   the [`CombatResolver`];
//! - supervision: publishes [`GridSnapshot`]s and stops the run when the
//!   duration elapses or nobody is left alive.
//!
//! Shutdown is cooperative through a shared [`StopSignal`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod detector;
pub mod driver;
pub mod metrics;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod stop;
pub(crate) mod workers;

pub use config::{ConfigError, ScanWindow, SimConfig};
pub use detector::{detect, CombatTask};
pub use driver::{SimError, SimState, Simulation, SimulationBuilder, StopReport};
pub use metrics::{MetricsSnapshot, SimMetrics};
pub use queue::{combat_queue, Dequeue, TaskReceiver, TaskSender};
pub use registry::Registry;
pub use resolver::{CombatResolver, Resolution};
pub use snapshot::{GridSnapshot, SnapshotSink};
pub use stop::{StopHandle, StopReason, StopSignal};
