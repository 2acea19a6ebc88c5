//! Error types for roster-core

use thiserror::Error;

/// Main error type for the roster-core library
///
/// All database-library failures are translated into one of these kinds at
/// the public API boundary; `rusqlite::Error` never escapes the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Database file could not be resolved or opened
    #[error("connection failed: {0}")]
    Connection(String),

    /// Schema migration failure (the whole pending batch was rolled back)
    #[error("migration failed: {0}")]
    Migration(String),

    /// Query-level database error
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Record not found where one was required
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for roster-core
pub type Result<T> = std::result::Result<T, Error>;
