//! Inverted index collaborators consumed by the searchers.
//!
//! Searchers only see the traits in [`reader`]: ordered posting-list readers,
//! document-ID readers and field dictionaries. [`upside_down::UpsideDownIndex`]
//! implements them on top of any [`crate::storage::KvStore`].

pub mod document;
pub mod reader;
pub mod rows;
pub mod upside_down;

use std::cmp::Ordering;
use std::fmt;

pub use document::{Document, Field};
pub use reader::{
    DictEntry, DocIdReader, FieldDict, IndexReader, TermFieldDoc, TermFieldReader,
    TermFieldVector,
};
pub use upside_down::{UpsideDownIndex, UpsideDownReader};

/// An opaque, ordered document identifier assigned by the index.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexInternalId(Vec<u8>);

impl IndexInternalId {
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        IndexInternalId(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn compare(&self, other: &IndexInternalId) -> Ordering {
        self.0.cmp(&other.0)
    }

    pub fn equals(&self, other: &IndexInternalId) -> bool {
        self.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clear the id while keeping its allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Overwrite the id with `bytes`, reusing the allocation.
    pub fn set(&mut self, bytes: &[u8]) {
        self.0.clear();
        self.0.extend_from_slice(bytes);
    }
}

impl From<&str> for IndexInternalId {
    fn from(s: &str) -> Self {
        IndexInternalId(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for IndexInternalId {
    fn from(bytes: Vec<u8>) -> Self {
        IndexInternalId(bytes)
    }
}

impl AsRef<[u8]> for IndexInternalId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for IndexInternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for IndexInternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexInternalId({})", String::from_utf8_lossy(&self.0))
    }
}
