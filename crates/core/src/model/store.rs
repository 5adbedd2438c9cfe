//! Bounded multi-bucket reference store.
//!
//! The store is the golden model of the design's list table. It owns `M`
//! buckets, each holding at most `N` entries with unique keys, and serves
//! rank queries by sorting a copy of the bucket by key, largest first.
//!
//! Mutations that violate a precondition return a [`StoreError`] and leave
//! the store untouched. A bucket id outside `0..M` is a defect in the caller
//! and panics.

use tracing::debug;

use crate::common::error::StoreError;
use crate::model::entry::{Entry, QueryResult};
use crate::model::request::{Op, Query, Update};

/// One bounded, key-unique bucket.
///
/// Entries are kept in insertion order; rank order is derived on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    entries: Vec<Entry>,
}

impl Bucket {
    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bucket holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: u64) -> bool {
        self.position(key).is_some()
    }

    /// Copy of the entries sorted by key, largest first.
    pub fn sorted(&self) -> Vec<Entry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|l, r| r.key.cmp(&l.key));
        sorted
    }

    fn position(&self, key: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }
}

/// The reference store: `M` buckets of capacity `N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Store {
    buckets: Vec<Bucket>,
    capacity: usize,
}

impl Store {
    /// Creates a store of `buckets` empty buckets, each holding at most `capacity` entries.
    pub fn new(buckets: usize, capacity: usize) -> Self {
        Self {
            buckets: vec![Bucket::default(); buckets],
            capacity,
        }
    }

    /// Number of buckets (M).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Per-bucket capacity (N).
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read access to bucket `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not below [`Store::bucket_count`].
    pub fn bucket(&self, id: usize) -> &Bucket {
        assert!(
            id < self.buckets.len(),
            "bucket id {id} out of range (store has {} buckets)",
            self.buckets.len()
        );
        &self.buckets[id]
    }

    fn bucket_mut(&mut self, id: usize) -> &mut Bucket {
        assert!(
            id < self.buckets.len(),
            "bucket id {id} out of range (store has {} buckets)",
            self.buckets.len()
        );
        &mut self.buckets[id]
    }

    /// Number of entries in bucket `id`.
    pub fn len(&self, id: usize) -> usize {
        self.bucket(id).len()
    }

    /// Whether bucket `id` is at capacity.
    pub fn is_full(&self, id: usize) -> bool {
        self.len(id) >= self.capacity
    }

    /// Entries of bucket `id` in insertion order.
    pub fn entries(&self, id: usize) -> &[Entry] {
        self.bucket(id).entries()
    }

    /// Keys of bucket `id` in insertion order.
    pub fn keys(&self, id: usize) -> Vec<u64> {
        self.entries(id).iter().map(|e| e.key).collect()
    }

    /// Entries of bucket `id` sorted by key, largest first.
    pub fn sorted(&self, id: usize) -> Vec<Entry> {
        self.bucket(id).sorted()
    }

    /// Removes every entry from bucket `id`.
    pub fn clear(&mut self, id: usize) {
        self.bucket_mut(id).entries.clear();
    }

    /// Appends `{key, size}` to bucket `id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Full`] if the bucket is at capacity,
    /// [`StoreError::DuplicateKey`] if `key` is already present.
    pub fn add(&mut self, id: usize, key: u64, size: u32) -> Result<(), StoreError> {
        let capacity = self.capacity;
        let bucket = self.bucket_mut(id);
        if bucket.len() >= capacity {
            return Err(StoreError::Full { id, capacity });
        }
        if bucket.contains(key) {
            return Err(StoreError::DuplicateKey { id, key });
        }
        bucket.entries.push(Entry::new(key, size));
        Ok(())
    }

    /// Removes the entry with `key` from bucket `id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyNotFound`] if the bucket does not hold `key`.
    pub fn delete(&mut self, id: usize, key: u64) -> Result<(), StoreError> {
        let bucket = self.bucket_mut(id);
        let pos = bucket
            .position(key)
            .ok_or(StoreError::KeyNotFound { id, key })?;
        let _ = bucket.entries.remove(pos);
        Ok(())
    }

    /// Overwrites the size of the entry with `key` in bucket `id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::KeyNotFound`] if the bucket does not hold `key`.
    pub fn replace(&mut self, id: usize, key: u64, size: u32) -> Result<(), StoreError> {
        let bucket = self.bucket_mut(id);
        let pos = bucket
            .position(key)
            .ok_or(StoreError::KeyNotFound { id, key })?;
        bucket.entries[pos].size = size;
        Ok(())
    }

    /// Applies a mutation request.
    ///
    /// # Errors
    ///
    /// Propagates the rejection of the underlying operation.
    pub fn apply(&mut self, update: &Update) -> Result<(), StoreError> {
        debug!("Applying state update: {update}");
        match update.op {
            Op::Clear => {
                self.clear(update.id);
                Ok(())
            }
            Op::Add => self.add(update.id, update.key, update.size),
            Op::Delete => self.delete(update.id, update.key),
            Op::Replace => self.replace(update.id, update.key, update.size),
        }
    }

    /// Serves a rank query against bucket `id`.
    ///
    /// Ranks at or beyond the bucket length yield an error result.
    pub fn query(&self, id: usize, level: usize) -> QueryResult {
        let sorted = self.sorted(id);
        sorted.get(level).map_or_else(QueryResult::miss, |entry| {
            QueryResult::hit(*entry, sorted.len() as u32)
        })
    }

    /// Serves a [`Query`] request.
    pub fn serve(&self, query: &Query) -> QueryResult {
        debug!("Issuing query: {query}");
        self.query(query.id, query.level)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(crate::common::BUCKET_COUNT, crate::common::BUCKET_CAPACITY)
    }
}
