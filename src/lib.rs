//! # shardkv
//!
//! A concurrent, in-memory key-value store driven by batched job files:
//! - Sharded per-bucket reader/writer locking (independent keys mutate in parallel)
//! - Ordered multi-lock acquisition (deadlock-free multi-key commands)
//! - Point-in-time backups via clone-and-hand-off snapshots
//! - Fixed worker pool draining a shared queue of `*.job` files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Job Dispatcher                          │
//! │               (N workers, shared file cursor)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ parsed commands
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Command Executor                          │
//! │        (write / read / delete / show / wait / backup)        │
//! └──────────┬──────────────────────────────┬────────────────────┘
//!            │ lock plan                    │ snapshot
//!            ▼                              ▼
//!   ┌──────────────────┐          ┌──────────────────┐
//!   │      Store        │          │      Backup      │
//!   │  global RwLock    │          │   Coordinator    │
//!   │  Table (RwLock    │          │ (admission bound,│
//!   │   per bucket)     │          │  export threads) │
//!   └──────────────────┘          └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod store;
pub mod executor;
pub mod backup;
pub mod job;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ShardError};
pub use config::Config;
pub use store::Store;
pub use executor::Executor;
pub use backup::BackupCoordinator;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of shardkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
