#![forbid(unsafe_code)]

//! Error types at the engine's two fallible boundaries.
//!
//! Neither error ever escapes a controller operation: persistence failures
//! degrade the controller to non-persistent mode, and catalog errors are only
//! produced while building a catalog.

use std::fmt;

/// Errors reported by a [`TourPersistence`](crate::persistence::TourPersistence) backend.
#[derive(Debug)]
pub enum PersistenceError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Stored document has an unexpected shape.
    Corruption(String),
    /// Backend cannot be used at all (sandboxed, read-only, disabled).
    Unavailable(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "I/O error: {e}"),
            PersistenceError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            PersistenceError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            PersistenceError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors found while validating a step catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no steps.
    Empty,
    /// A spotlight step has no (or an empty) target locator.
    MissingTarget { id: String },
    /// A non-spotlight step names a target.
    UnexpectedTarget { id: String },
    /// Two steps share an id.
    DuplicateId { id: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "tour catalog has no steps"),
            CatalogError::MissingTarget { id } => {
                write!(f, "spotlight step `{id}` has no target locator")
            }
            CatalogError::UnexpectedTarget { id } => {
                write!(f, "step `{id}` is not a spotlight but names a target")
            }
            CatalogError::DuplicateId { id } => write!(f, "duplicate step id `{id}`"),
        }
    }
}

impl std::error::Error for CatalogError {}
