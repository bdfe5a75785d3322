//! Fixed-bucket hash table
//!
//! Bucket chains are plain `Vec`s with pure data operations; the `RwLock`
//! around each bucket is acquired by callers through a
//! [`LockPlan`](super::LockPlan) or, for full scans, one bucket at a time in
//! ascending index order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;

/// Number of buckets in the table. Fixed at compile time; the table is never
/// resized.
pub const BUCKET_COUNT: usize = 64;

/// A stored key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// One bucket's collision chain.
///
/// Pure data structure: no locking of its own. A key appears at most once in
/// the chain.
#[derive(Debug, Default)]
pub struct Bucket {
    entries: Vec<Entry>,
}

impl Bucket {
    /// Overwrite the value if the key exists, else append a new entry.
    pub fn insert_or_update(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_string();
        } else {
            self.entries.push(Entry {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Return an independent copy of the value, or `None` if absent.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.clone())
    }

    /// Detach the entry from the chain. Returns `false` if the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|e| e.key == key) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Iterate the chain in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The sharded table: `BUCKET_COUNT` buckets, each behind its own
/// reader/writer lock.
#[derive(Debug)]
pub struct Table {
    buckets: Box<[RwLock<Bucket>]>,
}

impl Table {
    /// Allocate all buckets empty.
    pub fn new() -> Self {
        let buckets = (0..BUCKET_COUNT)
            .map(|_| RwLock::new(Bucket::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { buckets }
    }

    /// Deterministic bucket index for a key.
    pub fn bucket_index(key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % BUCKET_COUNT
    }

    /// The lock guarding bucket `index`.
    ///
    /// Panics if `index >= BUCKET_COUNT`.
    pub fn bucket(&self, index: usize) -> &RwLock<Bucket> {
        &self.buckets[index]
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Visit every entry in bucket order, then chain order within a bucket.
    ///
    /// Caller must hold the global lock in write mode; the per-bucket read
    /// locks taken here are then uncontended.
    pub fn for_each_entry(&self, mut visitor: impl FnMut(&str, &str)) {
        for bucket in self.buckets.iter() {
            let bucket = bucket.read();
            for entry in bucket.entries() {
                visitor(&entry.key, &entry.value);
            }
        }
    }

    /// Deep-copy every entry in bucket/chain order.
    ///
    /// Same locking contract as [`Table::for_each_entry`]. The returned copy
    /// shares no memory with the table.
    pub fn snapshot(&self) -> Vec<Entry> {
        let mut entries = Vec::new();
        for bucket in self.buckets.iter() {
            let bucket = bucket.read();
            entries.extend(bucket.entries().cloned());
        }
        entries
    }

    /// Total number of stored entries. Read-locks each bucket transiently.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.read().len()).sum()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
