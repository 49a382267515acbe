//! Line-oriented persistence for brawl populations.
//!
//! Each entity is one line:
//!
//! ```text
//! <kind> <x> <y> <name...>
//! ```
//!
//! Fields are space-separated and the name is the rest of the line, so it
//! may contain spaces. Coordinates are decimal.
//!
//! - [`save`] writes a [`Registry`](brawl_engine::Registry) to any `Write` sink
//! - [`load`] replaces a registry's population from any `BufRead` source,
//!   skipping malformed lines
//! - [`save_to_path`] / [`load_from_path`] wrap both around files

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::PersistError;
pub use reader::{load, load_from_path, read_entities, LoadReport, SkippedLine};
pub use writer::{save, save_to_path, SaveScope};
