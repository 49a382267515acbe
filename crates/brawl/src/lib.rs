//! brawl: a concurrent dungeon combat simulator.
//!
//! Entities of three kinds wander a 100×100 world. Whenever one comes
//! within reach of another a combat task is queued, and a single
//! resolver thread settles each fight with a dice contest. A supervisor
//! prints the dungeon on a coarse grid and ends the run after a fixed
//! duration or when nobody is left.
//!
//! This is the facade crate: it re-exports the sub-crates and adds the
//! concrete console and file sinks used by the `brawl` binary.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use brawl::prelude::*;
//!
//! let mut sim = Simulation::builder()
//!     .config(SimConfig {
//!         population: 10,
//!         tick_interval: Duration::from_millis(5),
//!         duration: Duration::from_millis(50),
//!         seed: Some(1),
//!         ..SimConfig::default()
//!     })
//!     .observer(Arc::new(ConsoleObserver::new(std::io::sink())))
//!     .build();
//! sim.start().unwrap();
//! sim.wait(Duration::from_secs(2));
//! let report = sim.stop();
//! assert_eq!(report.threads_joined, 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `brawl-core` | Kinds, entities, factory, dice and observer capabilities |
//! | [`engine`] | `brawl-engine` | Registry, detection, combat queue, resolver, driver |
//! | [`persist`] | `brawl-persist` | Line-oriented save and load |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and capabilities (`brawl-core`).
pub use brawl_core as types;

/// Simulation engine (`brawl-engine`).
pub use brawl_engine as engine;

/// Save and load (`brawl-persist`).
pub use brawl_persist as persist;

pub mod logging;
pub mod sinks;

pub use sinks::{ConsoleObserver, ConsoleSnapshotSink, FileObserver, DEFAULT_LOG_FILE};

/// Common imports for typical brawl usage.
pub mod prelude {
    pub use brawl_core::{
        Dice, Entity, EntityFactory, EntityId, Event, Kind, Observer, ObserverError, RandomDice,
    };

    pub use brawl_engine::{
        GridSnapshot, ScanWindow, SimConfig, SimState, Simulation, SnapshotSink, StopHandle,
        StopReason, StopReport,
    };

    pub use brawl_persist::{load_from_path, save_to_path, SaveScope};

    pub use crate::sinks::{ConsoleObserver, ConsoleSnapshotSink, FileObserver};
}
