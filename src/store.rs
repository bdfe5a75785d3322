//! Store Module
//!
//! The shared, singly-initialized owner of the table.
//!
//! ## Global lock + lifecycle in one primitive
//!
//! The store wraps the table in `RwLock<Option<Table>>`:
//! - read mode is the global lock's shared mode: every bounded-key operation
//!   holds it for its duration, concurrently with other such operations;
//! - write mode is the exclusive mode: full-table scans (show, backup
//!   snapshot) and the `init`/`terminate` lifecycle transitions;
//! - `None` means "not initialized": any access observing it fails with
//!   [`ShardError::NotInitialized`], and `init` on `Some` fails with
//!   [`ShardError::AlreadyInitialized`].
//!
//! The store is passed explicitly (usually as `Arc<Store>`) to every
//! component; there is no ambient global state.

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::error::{Result, ShardError};
use crate::table::Table;

/// Shared owner of the table and its global lock.
pub struct Store {
    state: RwLock<Option<Table>>,
}

impl Store {
    /// Create an uninitialized store. Call [`Store::init`] before use.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Allocate the table, all buckets empty.
    ///
    /// Fails with `AlreadyInitialized` if called twice without an intervening
    /// [`Store::terminate`].
    pub fn init(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.is_some() {
            return Err(ShardError::AlreadyInitialized);
        }
        *state = Some(Table::new());
        Ok(())
    }

    /// Release the table and every stored entry.
    ///
    /// Fails with `NotInitialized` if the store was never initialized (or was
    /// already terminated). Any operation after this fails the same way.
    pub fn terminate(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.take().is_none() {
            return Err(ShardError::NotInitialized);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().is_some()
    }

    /// Global lock, read mode: shared access for bounded-key operations.
    ///
    /// The guard pins the table for the operation's duration; per-bucket
    /// locks are acquired on top of it through a
    /// [`LockPlan`](crate::table::LockPlan).
    pub fn table_shared(&self) -> Result<MappedRwLockReadGuard<'_, Table>> {
        RwLockReadGuard::try_map(self.state.read(), Option::as_ref)
            .map_err(|_| ShardError::NotInitialized)
    }

    /// Global lock, write mode: exclusive access for full-table operations.
    ///
    /// Excludes every bounded-key operation for the guard's lifetime, so the
    /// holder observes a consistent cut of the table.
    pub fn table_exclusive(&self) -> Result<MappedRwLockWriteGuard<'_, Table>> {
        RwLockWriteGuard::try_map(self.state.write(), Option::as_mut)
            .map_err(|_| ShardError::NotInitialized)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
