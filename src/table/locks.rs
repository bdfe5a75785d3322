//! Ordered multi-bucket lock acquisition
//!
//! A [`LockPlan`] is the deduplicated, ascending-sorted set of bucket indices
//! touched by one command's key set. Acquiring multi-bucket locks only
//! through a plan gives every thread the same total lock order, so two
//! commands touching overlapping bucket sets can never deadlock. Guards are
//! RAII: they release on every exit path, including early returns.

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use super::table::{Bucket, Table};

/// The set of distinct bucket indices a command will lock, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockPlan {
    indices: Vec<usize>,
}

impl LockPlan {
    /// Plan the buckets for a key set: hash each key, deduplicate, sort.
    pub fn for_keys<S: AsRef<str>>(keys: impl IntoIterator<Item = S>) -> Self {
        let mut indices: Vec<usize> = keys
            .into_iter()
            .map(|k| Table::bucket_index(k.as_ref()))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// The planned bucket indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Acquire each planned bucket lock in read mode, ascending.
    pub fn read_guards<'t>(&self, table: &'t Table) -> BucketReadSet<'t> {
        let guards = self
            .indices
            .iter()
            .map(|&i| table.bucket(i).read())
            .collect();
        BucketReadSet {
            indices: self.indices.clone(),
            guards,
        }
    }

    /// Acquire each planned bucket lock in write mode, ascending.
    pub fn write_guards<'t>(&self, table: &'t Table) -> BucketWriteSet<'t> {
        let guards = self
            .indices
            .iter()
            .map(|&i| table.bucket(i).write())
            .collect();
        BucketWriteSet {
            indices: self.indices.clone(),
            guards,
        }
    }
}

/// Read guards for a planned bucket set.
pub struct BucketReadSet<'t> {
    indices: Vec<usize>,
    guards: Vec<RwLockReadGuard<'t, Bucket>>,
}

impl BucketReadSet<'_> {
    /// The bucket holding `key`.
    ///
    /// Panics if the key's bucket was not part of the plan (a caller bug).
    pub fn bucket(&self, key: &str) -> &Bucket {
        let pos = self.position(key);
        &self.guards[pos]
    }

    fn position(&self, key: &str) -> usize {
        let index = Table::bucket_index(key);
        self.indices
            .binary_search(&index)
            .expect("key's bucket not covered by the lock plan")
    }
}

/// Write guards for a planned bucket set.
pub struct BucketWriteSet<'t> {
    indices: Vec<usize>,
    guards: Vec<RwLockWriteGuard<'t, Bucket>>,
}

impl BucketWriteSet<'_> {
    /// Mutable access to the bucket holding `key`.
    ///
    /// Panics if the key's bucket was not part of the plan (a caller bug).
    pub fn bucket_mut(&mut self, key: &str) -> &mut Bucket {
        let pos = self.position(key);
        &mut self.guards[pos]
    }

    fn position(&self, key: &str) -> usize {
        let index = Table::bucket_index(key);
        self.indices
            .binary_search(&index)
            .expect("key's bucket not covered by the lock plan")
    }
}
