//! Command Executor
//!
//! One operation per command kind, all following the table's locking
//! protocol: global lock in read mode plus planned bucket locks for
//! bounded-key commands, global lock in write mode for full-table commands.
//!
//! Output shapes are byte-exact (consumed by downstream tooling):
//! - read:   `[(k1,v1)(k2,KVSERROR)]\n`, pairs concatenated with no separator
//! - delete: `[(k1,KVSMISSING)]\n`, emitted only if at least one key was absent
//! - show:   `(key, value)\n` per entry, bucket/chain order
//! - wait:   `Waiting ...\n` before sleeping, only when the delay is non-zero
//!
//! Each worker owns its job's output stream, so one `write_all` per block is
//! all the atomicity a block needs. Diagnostics never go to the job output;
//! they go to the tracing error channel.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::store::Store;
use crate::table::LockPlan;

/// Marker emitted for a read of an absent key.
const READ_ABSENT: &str = "KVSERROR";

/// Marker emitted for a delete of an absent key.
const DELETE_ABSENT: &str = "KVSMISSING";

/// Executes commands against a shared store.
#[derive(Clone)]
pub struct Executor {
    store: Arc<Store>,
}

impl Executor {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Apply a batch of key/value pairs.
    ///
    /// Pairs apply in request order under write locks on the planned buckets.
    /// The batch is not atomic-abort: a failing pair would be logged and
    /// skipped while the rest of the batch still applies.
    pub fn write(&self, pairs: &[(String, String)]) -> Result<()> {
        let table = self.store.table_shared()?;
        let plan = LockPlan::for_keys(pairs.iter().map(|(k, _)| k));
        let mut buckets = plan.write_guards(&table);
        for (key, value) in pairs {
            buckets.bucket_mut(key).insert_or_update(key, value);
        }
        Ok(())
    }

    /// Look up a batch of keys, emitting one bracketed block.
    ///
    /// Bucket locks are acquired in plan order (ascending bucket index);
    /// emission is in the original request order regardless.
    pub fn read<W: Write>(&self, keys: &[String], out: &mut W) -> Result<()> {
        let block = {
            let table = self.store.table_shared()?;
            let plan = LockPlan::for_keys(keys);
            let buckets = plan.read_guards(&table);
            let mut block = String::from("[");
            for key in keys {
                match buckets.bucket(key).lookup(key) {
                    Some(value) => block.push_str(&format!("({key},{value})")),
                    None => block.push_str(&format!("({key},{READ_ABSENT})")),
                }
            }
            block.push_str("]\n");
            block
        };
        out.write_all(block.as_bytes())?;
        Ok(())
    }

    /// Remove a batch of keys in request order.
    ///
    /// Emits a single bracketed block naming exactly the keys that were
    /// absent; emits nothing when every key was present.
    pub fn delete<W: Write>(&self, keys: &[String], out: &mut W) -> Result<()> {
        let missing = {
            let table = self.store.table_shared()?;
            let plan = LockPlan::for_keys(keys);
            let mut buckets = plan.write_guards(&table);
            let mut missing = Vec::new();
            for key in keys {
                if !buckets.bucket_mut(key).remove(key) {
                    missing.push(key.as_str());
                }
            }
            missing
                .iter()
                .map(|key| format!("({key},{DELETE_ABSENT})"))
                .collect::<Vec<_>>()
        };
        if !missing.is_empty() {
            let block = format!("[{}]\n", missing.concat());
            out.write_all(block.as_bytes())?;
        }
        Ok(())
    }

    /// Dump every entry in bucket/chain order.
    ///
    /// Holds the global lock in write mode only: that alone excludes every
    /// bounded-key reader and writer, so no per-bucket contention exists.
    pub fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let dump = {
            let table = self.store.table_exclusive()?;
            let mut dump = String::new();
            table.for_each_entry(|key, value| {
                dump.push_str(&format!("({key}, {value})\n"));
            });
            dump
        };
        out.write_all(dump.as_bytes())?;
        Ok(())
    }

    /// Pause the calling worker only. Zero delay is a no-op.
    pub fn wait<W: Write>(&self, delay_ms: u64, out: &mut W) -> Result<()> {
        if delay_ms == 0 {
            return Ok(());
        }
        out.write_all(b"Waiting ...\n")?;
        thread::sleep(Duration::from_millis(delay_ms));
        Ok(())
    }
}
