//! Error taxonomy for the catalog pipeline and the shell.
//!
//! Fatal errors (fetch, cache, unreadable visitor table) abort startup.
//! Per-record errors (`MalformedCount`, `MissingField`) are surfaced so the
//! caller can skip the record and keep going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParkError {
    /// Network or API failure while fetching park records
    #[error("Failed to fetch park data: {0}")]
    Fetch(String),

    /// A visitor-count cell is not an integer once separators are removed
    #[error("Malformed visitor count {value:?} for {park:?}")]
    MalformedCount { park: String, value: String },

    /// A raw park record lacks a required field
    #[error("Park record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Malformed menu selection; recovered by re-prompting
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),

    /// Cache file could not be read, parsed or written
    #[error("Cache error at {path}: {message}")]
    Cache { path: String, message: String },

    /// Visitor table could not be opened or decoded
    #[error("Visitor table error: {0}")]
    VisitorTable(String),

    /// Rule file could not be read or parsed
    #[error("Rule table error: {0}")]
    Rules(String),
}

/// Result type for pipeline operations
pub type ParkResult<T> = Result<T, ParkError>;
