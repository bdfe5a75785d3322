//! Table Module
//!
//! The sharded in-memory key-value table.
//!
//! ## Responsibilities
//! - Fixed-bucket chained hash table mapping string keys to string values
//! - Pure data operations on buckets (locking is the caller's job)
//! - One reader/writer lock per bucket; multi-bucket acquisition follows a
//!   total order (ascending bucket index) computed by [`LockPlan`]
//! - Full-table traversal and deep-copy snapshots in bucket/chain order
//!
//! ## Locking Protocol
//! Every caller of the bucket mutators/readers must:
//! 1. Hold the store's global lock: read mode for bounded key sets, write
//!    mode for full-table operations (see [`crate::store::Store`]).
//! 2. For a multi-key operation, acquire the distinct bucket locks through a
//!    [`LockPlan`]: deduplicated, ascending bucket index, each lock at most
//!    once. Writes take bucket locks in write mode, reads in read mode.
//! 3. Release through RAII guards on every exit path.

mod table;
mod locks;

pub use table::{Bucket, Entry, Table, BUCKET_COUNT};
pub use locks::{BucketReadSet, BucketWriteSet, LockPlan};
