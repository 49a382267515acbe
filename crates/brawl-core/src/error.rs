//! Error types for the brawl core crate.
//!
//! None of these are fatal to a running simulation: the engine and the
//! persistence layer contain them at the point of detection.

use thiserror::Error;

/// Errors from explicit entity construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The kind name is not one of the known kinds.
    #[error("unknown entity kind '{kind}'")]
    UnknownKind {
        /// The unrecognized name.
        kind: String,
    },
}

/// Errors from parsing one persisted entity record.
///
/// Every variant is a malformed record: the loader skips the line and
/// keeps going.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseError {
    /// A required leading field is absent.
    #[error("missing field '{field}'")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// A coordinate field is not a finite decimal number.
    #[error("field '{field}' is not a finite number: '{value}'")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw token.
        value: String,
    },
    /// Coordinates parsed but lie outside the world bounds.
    #[error("position ({x}, {y}) is outside the world")]
    OutOfBounds {
        /// Parsed x coordinate.
        x: f64,
        /// Parsed y coordinate.
        y: f64,
    },
    /// The record bytes are not valid UTF-8.
    #[error("record is not valid UTF-8 (bad byte at offset {offset})")]
    InvalidEncoding {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
    /// The kind token is not a known kind.
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// A notification sink failed to handle an event.
///
/// Returned by [`Observer`](crate::Observer) methods. The calling loop
/// logs it and moves on.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The sink's underlying writer failed.
    #[error("observer I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The sink refused the event.
    #[error("observer rejected event: {reason}")]
    Rejected {
        /// Human-readable description of the refusal.
        reason: String,
    },
}
