//! Key-value store abstraction traits and common types.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An ordered key-value store.
pub trait KvStore: Send + Sync + std::fmt::Debug {
    /// Open a reader over a consistent snapshot of the store.
    fn reader(&self) -> Result<Box<dyn KvReader>>;

    /// Open a writer. Batches become visible to readers opened afterwards.
    fn writer(&self) -> Result<Box<dyn KvWriter>>;

    /// Close the store and release resources.
    fn close(&self) -> Result<()>;
}

/// A read-only view of the store.
pub trait KvReader: Send + Sync + std::fmt::Debug {
    /// Get the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Iterate all keys starting with `prefix`, in key order.
    fn prefix_iterator(&self, prefix: &[u8]) -> Box<dyn KvIterator>;

    /// Iterate keys in `[start, end)`. An empty `end` means unbounded.
    fn range_iterator(&self, start: &[u8], end: &[u8]) -> Box<dyn KvIterator>;

    /// Release the snapshot.
    fn close(&mut self) -> Result<()>;
}

/// A cursor over an ordered key range.
///
/// A fresh iterator is positioned on the first key of its range.
pub trait KvIterator: Send + std::fmt::Debug {
    /// Move to the first key of the range.
    fn seek_first(&mut self);

    /// Move to the first key greater than or equal to `key`, clamped to the
    /// iterator's range.
    fn seek(&mut self, key: &[u8]);

    /// Step to the next key.
    fn next(&mut self);

    /// Current key, if valid.
    fn key(&self) -> Option<&[u8]>;

    /// Current value, if valid.
    fn value(&self) -> Option<&[u8]>;

    /// Current key and value, if valid.
    fn current(&self) -> Option<(&[u8], &[u8])>;

    /// Whether the iterator is positioned on an entry.
    fn valid(&self) -> bool;

    /// Release the iterator.
    fn close(&mut self) -> Result<()>;
}

/// Writes batches of mutations.
pub trait KvWriter: Send + std::fmt::Debug {
    /// Start an empty batch.
    fn new_batch(&self) -> KvBatch;

    /// Apply every operation of the batch atomically.
    fn execute_batch(&mut self, batch: KvBatch) -> Result<()>;

    /// Close the writer.
    fn close(&mut self) -> Result<()>;
}

/// A single queued mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    Set(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// An ordered list of mutations applied together.
#[derive(Debug, Clone, Default)]
pub struct KvBatch {
    ops: Vec<KvOp>,
}

impl KvBatch {
    pub fn new() -> Self {
        KvBatch::default()
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(KvOp::Set(key, value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(KvOp::Delete(key));
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<KvOp> {
        self.ops
    }
}

/// Configuration for key-value stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum number of operations accepted in one batch. Zero means unbounded.
    pub max_batch_ops: usize,
}
