//! Backup Coordinator
//!
//! Point-in-time export of the table to a `.bck` file.
//!
//! ## Clone-and-hand-off
//!
//! Holding the table locks for the whole disk write would stall every worker
//! for the export's duration. Instead the coordinator:
//! 1. waits for an admission slot (at most `max_in_flight` exports at once),
//! 2. deep-copies the table under the global lock in write mode (the bucket
//!    read locks inside [`Table::snapshot`] are then uncontended),
//! 3. releases everything and hands the copy to a spawned export thread.
//!
//! The export thread writes the snapshot with no further synchronization
//! (it owns the only reference to the copy), then decrements the in-flight
//! counter. `wait_for_all` is the shutdown barrier: the process drains it
//! before terminating the store.
//!
//! [`Table::snapshot`]: crate::table::Table::snapshot

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::error::Result;
use crate::store::Store;
use crate::table::Entry;

/// Bounds and tracks in-flight backup exports.
pub struct BackupCoordinator {
    max_in_flight: usize,
    in_flight: Mutex<usize>,
    completed: Condvar,
}

impl BackupCoordinator {
    /// A coordinator admitting up to `max_in_flight` concurrent exports
    /// (clamped to at least one).
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
            in_flight: Mutex::new(0),
            completed: Condvar::new(),
        }
    }

    /// Snapshot the store and export it to `path` on a background thread.
    ///
    /// Blocks while the admission bound is reached, then only for the
    /// duration of the deep copy; returns before the file is written. The
    /// admission counter and condvar are independent of the table locks, so
    /// admission checks never contend with key traffic.
    pub fn spawn_export(self: &Arc<Self>, store: &Store, path: PathBuf) -> Result<()> {
        {
            let mut in_flight = self.in_flight.lock();
            while *in_flight >= self.max_in_flight {
                self.completed.wait(&mut in_flight);
            }
            *in_flight += 1;
        }

        let snapshot = match store.table_exclusive() {
            Ok(table) => table.snapshot(),
            Err(e) => {
                self.finish_one();
                return Err(e);
            }
        };

        let coordinator = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("backup-export".to_string())
            .spawn(move || {
                if let Err(e) = write_backup_file(&path, &snapshot) {
                    tracing::error!(path = %path.display(), error = %e, "backup export failed");
                } else {
                    tracing::debug!(path = %path.display(), entries = snapshot.len(), "backup written");
                }
                coordinator.finish_one();
            });

        if let Err(e) = spawned {
            self.finish_one();
            return Err(e.into());
        }
        Ok(())
    }

    /// Number of exports currently in flight.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.lock()
    }

    /// Block until every in-flight export has finished.
    pub fn wait_for_all(&self) {
        let mut in_flight = self.in_flight.lock();
        while *in_flight > 0 {
            self.completed.wait(&mut in_flight);
        }
    }

    fn finish_one(&self) {
        let mut in_flight = self.in_flight.lock();
        *in_flight -= 1;
        self.completed.notify_all();
    }
}

/// Write a snapshot in the show line shape: `(key, value)\n` per entry.
fn write_backup_file(path: &Path, entries: &[Entry]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for entry in entries {
        writeln!(out, "({}, {})", entry.key, entry.value)?;
    }
    out.flush()
}
