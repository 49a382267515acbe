//! Core types and traits for the brawl combat simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the brawl workspace:
//! entity kinds and their fixed stats, the [`Entity`] record, the
//! [`EntityFactory`], and the two pluggable capabilities the engine
//! calls into: [`Dice`] for contest rolls and [`Observer`] for event
//! notification.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dice;
pub mod entity;
pub mod error;
pub mod factory;
pub mod id;
pub mod kind;
pub mod observer;

pub use dice::{Dice, RandomDice};
pub use entity::{Entity, Position, WORLD_MAX, WORLD_MIN};
pub use error::{EntityError, ObserverError, ParseError};
pub use factory::EntityFactory;
pub use id::EntityId;
pub use kind::{Kind, KindCounts, KindStats};
pub use observer::{Event, Observer, ObserverSet};
