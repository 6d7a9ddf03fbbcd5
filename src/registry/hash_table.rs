use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use crate::error::{Error, Result};

/// Bucket count used when none is given.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

/// String-keyed hash table with a fixed number of buckets and chaining.
///
/// The bucket count is chosen at construction and never changes; a bucket
/// holds every entry whose key hashes to it. Keys compare by exact string
/// equality. Inserting an existing key replaces its value.
///
/// Growth is fallible: allocation failure is reported with kind `Memory`
/// instead of aborting.
#[derive(Debug)]
pub struct HashTable<V, S = RandomState> {
    buckets: Vec<Vec<Entry<V>>>,
    len: usize,
    hasher: S,
}

impl<V> HashTable<V> {
    /// Create an empty table with `bucket_count` buckets.
    pub fn new(bucket_count: usize) -> Result<Self> {
        Self::with_hasher(bucket_count, RandomState::new())
    }
}

impl<V, S: BuildHasher> HashTable<V, S> {
    /// Create an empty table with `bucket_count` buckets hashed by `hasher`.
    pub fn with_hasher(bucket_count: usize, hasher: S) -> Result<Self> {
        if bucket_count == 0 {
            return Err(Error::invalid_argument("hash table needs at least one bucket"));
        }

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count).map_err(|e| {
            Error::memory(format!("cannot allocate {} buckets: {}", bucket_count, e))
        })?;
        buckets.resize_with(bucket_count, Vec::new);

        Ok(Self {
            buckets,
            len: 0,
            hasher,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: &str) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];

        if let Some(entry) = bucket.iter_mut().find(|entry| entry.key == key) {
            return Ok(Some(std::mem::replace(&mut entry.value, value)));
        }

        bucket
            .try_reserve(1)
            .map_err(|e| Error::memory(format!("cannot store key {:?}: {}", key, e)))?;
        let mut owned_key = String::new();
        owned_key
            .try_reserve_exact(key.len())
            .map_err(|e| Error::memory(format!("cannot store key {:?}: {}", key, e)))?;
        owned_key.push_str(key);

        bucket.push(Entry {
            key: owned_key,
            value,
        });
        self.len += 1;
        Ok(None)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.buckets[index]
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Detach the entry for `key` and hand its value back.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|entry| entry.key == key)?;
        self.len -= 1;
        Some(bucket.swap_remove(position).value)
    }

    /// Drop every entry, keeping the buckets.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }
}
