use std::any::Any;
use std::fmt;

use tracing::trace;

use super::hash_table::{HashTable, DEFAULT_BUCKET_COUNT};
use crate::error::Result;

/// An opaque value held by [`ParseInfo`].
pub type Value = Box<dyn Any + Send>;

/// Store of validated field values carried between parsing passes.
///
/// Only values the parser has already validated belong here; the registry
/// does no checking of its own, so anything read back can be trusted to the
/// same degree it was trusted when stored. Values are keyed by field name
/// and can be of any type.
///
/// [`remove`](ParseInfo::remove) hands ownership of a value back to the
/// caller. Values still present when the registry is dropped are dropped
/// with it.
pub struct ParseInfo {
    table: HashTable<Value>,
}

impl ParseInfo {
    /// Create an empty registry with the default bucket count.
    pub fn new() -> Result<Self> {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Create an empty registry whose table has `bucket_count` buckets.
    pub fn with_buckets(bucket_count: usize) -> Result<Self> {
        Ok(Self {
            table: HashTable::new(bucket_count)?,
        })
    }

    /// Store `value` under `field`, replacing any previous value.
    ///
    /// Fails only if memory for the entry cannot be allocated.
    pub fn set<T: Any + Send>(&mut self, field: &str, value: T) -> Result<()> {
        self.set_value(field, Box::new(value))
    }

    /// Store an already boxed value under `field`.
    pub fn set_value(&mut self, field: &str, value: Value) -> Result<()> {
        let replaced = self.table.insert(field, value)?;
        trace!(field, replaced = replaced.is_some(), "parse info set");
        Ok(())
    }

    /// Look up `field` as a `T`.
    ///
    /// Returns `None` if the field is absent or holds a different type.
    pub fn get<T: Any>(&self, field: &str) -> Option<&T> {
        self.table.get(field)?.downcast_ref::<T>()
    }

    /// Look up the opaque value stored under `field`.
    pub fn get_value(&self, field: &str) -> Option<&Value> {
        self.table.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.table.contains_key(field)
    }

    /// Detach the value stored under `field` and give it to the caller.
    ///
    /// Removing a missing field returns `None`.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let value = self.table.remove(field);
        trace!(field, found = value.is_some(), "parse info remove");
        value
    }

    /// Detach the value stored under `field` if it is a `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, field: &str) -> Option<T> {
        if !self.table.get(field)?.is::<T>() {
            return None;
        }
        self.remove(field)?.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for ParseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseInfo")
            .field("entries", &self.table.len())
            .field("buckets", &self.table.bucket_count())
            .finish()
    }
}
