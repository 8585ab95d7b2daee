//! Ordered key-value storage backing the inverted index.
//!
//! The index never talks to a concrete engine: it reads through [`KvReader`]
//! snapshots and iterates with [`KvIterator`], and it writes with batches.
//! [`memory::MemoryKvStore`] is the bundled implementation.

pub mod memory;
pub mod traits;

pub use memory::MemoryKvStore;
pub use traits::{KvBatch, KvIterator, KvReader, KvStore, KvWriter, StorageConfig};
