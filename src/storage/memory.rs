//! In-memory key-value store with snapshot readers.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{LancetError, Result};
use crate::storage::traits::{
    KvBatch, KvIterator, KvOp, KvReader, KvStore, KvWriter, StorageConfig,
};

type Snapshot = Arc<BTreeMap<Vec<u8>, Vec<u8>>>;

/// An ordered in-memory store.
///
/// Readers hold an immutable snapshot of the map taken when they were opened.
/// Executing a batch publishes a new snapshot, so open readers never observe
/// partial writes.
#[derive(Debug, Clone)]
pub struct MemoryKvStore {
    data: Arc<RwLock<Snapshot>>,
    write_lock: Arc<Mutex<()>>,
    config: StorageConfig,
}

impl MemoryKvStore {
    /// Create a new memory store.
    pub fn new(config: StorageConfig) -> Self {
        MemoryKvStore {
            data: Arc::new(RwLock::new(Arc::new(BTreeMap::new()))),
            write_lock: Arc::new(Mutex::new(())),
            config,
        }
    }

    /// Create a new memory store with default configuration.
    pub fn new_default() -> Self {
        Self::new(StorageConfig::default())
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.data.read())
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new_default()
    }
}

impl KvStore for MemoryKvStore {
    fn reader(&self) -> Result<Box<dyn KvReader>> {
        Ok(Box::new(MemoryKvReader {
            snapshot: self.snapshot(),
        }))
    }

    fn writer(&self) -> Result<Box<dyn KvWriter>> {
        Ok(Box::new(MemoryKvWriter {
            store: self.clone(),
        }))
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A reader over one snapshot of a [`MemoryKvStore`].
#[derive(Debug)]
pub struct MemoryKvReader {
    snapshot: Snapshot,
}

impl KvReader for MemoryKvReader {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshot.get(key).cloned())
    }

    fn prefix_iterator(&self, prefix: &[u8]) -> Box<dyn KvIterator> {
        let end = prefix_successor(prefix);
        Box::new(MemoryKvIterator::new(
            Arc::clone(&self.snapshot),
            prefix.to_vec(),
            end,
        ))
    }

    fn range_iterator(&self, start: &[u8], end: &[u8]) -> Box<dyn KvIterator> {
        let end = if end.is_empty() {
            None
        } else {
            Some(end.to_vec())
        };
        Box::new(MemoryKvIterator::new(
            Arc::clone(&self.snapshot),
            start.to_vec(),
            end,
        ))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Smallest key greater than every key starting with `prefix`, if any.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[derive(Debug)]
struct MemoryKvIterator {
    snapshot: Snapshot,
    start: Vec<u8>,
    end: Option<Vec<u8>>,
    current: Option<(Vec<u8>, Vec<u8>)>,
}

impl MemoryKvIterator {
    fn new(snapshot: Snapshot, start: Vec<u8>, end: Option<Vec<u8>>) -> Self {
        let mut iter = MemoryKvIterator {
            snapshot,
            start,
            end,
            current: None,
        };
        iter.seek_first();
        iter
    }

    fn position(&mut self, lower: Bound<&[u8]>) {
        let found = self
            .snapshot
            .range::<[u8], _>((lower, Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()));
        self.current = match found {
            Some((key, value)) if self.in_range(&key) => Some((key, value)),
            _ => None,
        };
    }

    fn in_range(&self, key: &[u8]) -> bool {
        match &self.end {
            Some(end) => key < end.as_slice(),
            None => true,
        }
    }
}

impl KvIterator for MemoryKvIterator {
    fn seek_first(&mut self) {
        let start = self.start.clone();
        self.position(Bound::Included(start.as_slice()));
    }

    fn seek(&mut self, key: &[u8]) {
        if key < self.start.as_slice() {
            self.seek_first();
        } else {
            self.position(Bound::Included(key));
        }
    }

    fn next(&mut self) {
        if let Some((key, _)) = self.current.take() {
            self.position(Bound::Excluded(key.as_slice()));
        }
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(k, _)| k.as_slice())
    }

    fn value(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(_, v)| v.as_slice())
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.current
            .as_ref()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn close(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}

/// Applies batches to a [`MemoryKvStore`].
#[derive(Debug)]
pub struct MemoryKvWriter {
    store: MemoryKvStore,
}

impl KvWriter for MemoryKvWriter {
    fn new_batch(&self) -> KvBatch {
        KvBatch::new()
    }

    fn execute_batch(&mut self, batch: KvBatch) -> Result<()> {
        let max_ops = self.store.config.max_batch_ops;
        if max_ops > 0 && batch.len() > max_ops {
            return Err(LancetError::storage(format!(
                "batch of {} operations exceeds limit of {max_ops}",
                batch.len()
            )));
        }

        let _guard = self.store.write_lock.lock();
        let mut next = (*self.store.snapshot()).clone();
        for op in batch.into_ops() {
            match op {
                KvOp::Set(key, value) => {
                    next.insert(key, value);
                }
                KvOp::Delete(key) => {
                    next.remove(&key);
                }
            }
        }
        *self.store.data.write() = Arc::new(next);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> MemoryKvStore {
        let store = MemoryKvStore::new_default();
        let mut writer = store.writer().unwrap();
        let mut batch = writer.new_batch();
        for key in ["a", "b1", "b2", "b3", "c"] {
            batch.set(key.as_bytes().to_vec(), key.to_uppercase().into_bytes());
        }
        writer.execute_batch(batch).unwrap();
        store
    }

    fn keys(iter: &mut dyn KvIterator) -> Vec<String> {
        let mut rv = Vec::new();
        while let Some(key) = iter.key() {
            rv.push(String::from_utf8(key.to_vec()).unwrap());
            iter.next();
        }
        rv
    }

    #[test]
    fn test_prefix_iteration() {
        let store = populated();
        let reader = store.reader().unwrap();

        let mut iter = reader.prefix_iterator(b"b");
        assert_eq!(keys(iter.as_mut()), vec!["b1", "b2", "b3"]);

        iter.seek(b"b2");
        assert_eq!(iter.current(), Some((&b"b2"[..], &b"B2"[..])));

        iter.seek(b"a");
        assert_eq!(iter.key(), Some(&b"b1"[..]));

        iter.seek(b"z");
        assert!(!iter.valid());
    }

    #[test]
    fn test_range_iteration() {
        let store = populated();
        let reader = store.reader().unwrap();

        let mut iter = reader.range_iterator(b"b2", b"c");
        assert_eq!(keys(iter.as_mut()), vec!["b2", "b3"]);

        let mut iter = reader.range_iterator(b"b3", b"");
        assert_eq!(keys(iter.as_mut()), vec!["b3", "c"]);
    }

    #[test]
    fn test_snapshot_isolation() {
        let store = populated();
        let reader = store.reader().unwrap();

        let mut writer = store.writer().unwrap();
        let mut batch = writer.new_batch();
        batch.delete(b"a".to_vec());
        batch.set(b"d".to_vec(), b"D".to_vec());
        writer.execute_batch(batch).unwrap();

        assert_eq!(reader.get(b"a").unwrap(), Some(b"A".to_vec()));
        assert_eq!(reader.get(b"d").unwrap(), None);

        let fresh = store.reader().unwrap();
        assert_eq!(fresh.get(b"a").unwrap(), None);
        assert_eq!(fresh.get(b"d").unwrap(), Some(b"D".to_vec()));
    }

    #[test]
    fn test_batch_limit() {
        let store = MemoryKvStore::new(StorageConfig { max_batch_ops: 1 });
        let mut writer = store.writer().unwrap();
        let mut batch = writer.new_batch();
        batch.set(b"a".to_vec(), vec![]);
        batch.set(b"b".to_vec(), vec![]);
        assert!(writer.execute_batch(batch).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_prefix_successor() {
        assert_eq!(prefix_successor(b"ab"), Some(b"ac".to_vec()));
        assert_eq!(prefix_successor(&[0x01, 0xff]), Some(vec![0x02]));
        assert_eq!(prefix_successor(&[0xff]), None);
    }
}
