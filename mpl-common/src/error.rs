//! Common error types for MPL

use thiserror::Error;

/// Common result type for MPL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the MPL crates
///
/// `Structural`, `Duplicate`, `Integrity`, and `NotFound` carry fully formed
/// user-facing messages; the pipelines pass them through to the caller's
/// outcome object unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required directory or file absent from the on-disk tree
    #[error("{0}")]
    Structural(String),

    /// Fingerprint collision (library, patch)
    #[error("{0}")]
    Duplicate(String),

    /// Slot count mismatch discovered mid-pipeline
    #[error("{0}")]
    Integrity(String),

    /// Requested record not found
    #[error("{0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
