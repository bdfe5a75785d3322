//! Error types for shardkv
//!
//! Provides a unified error type for all operations.
//!
//! Key absence is deliberately not an error: a missing key is an expected
//! per-key outcome, surfaced in-band as `KVSERROR` (read) or `KVSMISSING`
//! (delete) in the job output, never through this enum.

use thiserror::Error;

/// Result type alias using ShardError
pub type Result<T> = std::result::Result<T, ShardError>;

/// Unified error type for shardkv operations
#[derive(Debug, Error)]
pub enum ShardError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Table Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("store has already been initialized")]
    AlreadyInitialized,

    #[error("store must be initialized")]
    NotInitialized,

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("invalid command: {0}")]
    MalformedCommand(String),

    #[error("capacity exceeded: {0}")]
    ResourceExhausted(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
