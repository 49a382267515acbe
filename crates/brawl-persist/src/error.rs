//! Error types for save and load.

use std::io;

use thiserror::Error;

/// Failures that abort a whole save or load.
///
/// A single malformed line is not an error; it is reported in
/// [`LoadReport::skipped`](crate::LoadReport::skipped).
#[derive(Debug, Error)]
pub enum PersistError {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
