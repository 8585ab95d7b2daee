//! Reader-side traits of the inverted index.

use crate::error::Result;
use crate::index::IndexInternalId;

/// Position of one term occurrence, as recorded in a term vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFieldVector {
    pub field: String,
    pub array_positions: Vec<u64>,
    pub pos: u64,
    pub start: u64,
    pub end: u64,
}

/// One posting: a document holding a term in a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFieldDoc {
    pub term: Vec<u8>,
    pub id: IndexInternalId,
    pub freq: u64,
    pub norm: f64,
    pub vectors: Vec<TermFieldVector>,
}

impl TermFieldDoc {
    /// Clear the posting while keeping its allocations for reuse.
    pub fn reset(&mut self) {
        self.term.clear();
        self.id.clear();
        self.freq = 0;
        self.norm = 0.0;
        self.vectors.clear();
    }
}

/// Filter consulted with a posting's `(freq, norm)` before it is returned.
/// Returning `false` skips the posting.
pub type FreqNormFilter<'a> = &'a mut dyn FnMut(u64, f64) -> bool;

/// Ordered iteration over the postings of one term in one field.
pub trait TermFieldReader: Send + std::fmt::Debug {
    /// Return the next posting that passes `filter`. `reuse` may carry a
    /// previously returned posting whose allocations can be recycled.
    fn next(
        &mut self,
        reuse: Option<TermFieldDoc>,
        filter: Option<FreqNormFilter<'_>>,
    ) -> Result<Option<TermFieldDoc>>;

    /// Return the first posting whose id is greater than or equal to `id`.
    fn advance(
        &mut self,
        id: &IndexInternalId,
        reuse: Option<TermFieldDoc>,
    ) -> Result<Option<TermFieldDoc>>;

    /// Number of documents holding the term.
    fn count(&self) -> u64;

    fn close(&mut self) -> Result<()>;
}

/// Ordered iteration over document ids.
pub trait DocIdReader: Send + std::fmt::Debug {
    fn next(&mut self) -> Result<Option<IndexInternalId>>;

    fn advance(&mut self, id: &IndexInternalId) -> Result<Option<IndexInternalId>>;

    /// Upper bound on the number of ids this reader yields.
    fn count(&self) -> u64;

    fn close(&mut self) -> Result<()>;
}

/// A dictionary entry: a term and its document frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub term: Vec<u8>,
    pub count: u64,
}

impl DictEntry {
    /// The term as UTF-8 text, if it is valid UTF-8.
    pub fn term_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.term).ok()
    }
}

/// Ordered iteration over the terms of one field.
pub trait FieldDict: Send + std::fmt::Debug {
    fn next(&mut self) -> Result<Option<DictEntry>>;

    fn close(&mut self) -> Result<()>;
}

/// A point-in-time view of an index.
pub trait IndexReader: Send + Sync + std::fmt::Debug {
    /// Open a posting reader for `term` in `field`.
    fn term_field_reader(
        &self,
        term: &[u8],
        field: &str,
        include_freq: bool,
        include_norm: bool,
        include_term_vectors: bool,
    ) -> Result<Box<dyn TermFieldReader>>;

    /// Iterate every live document.
    fn doc_id_reader_all(&self) -> Result<Box<dyn DocIdReader>>;

    /// Iterate the live documents among the given external ids.
    fn doc_id_reader_only(&self, ids: &[String]) -> Result<Box<dyn DocIdReader>>;

    /// Iterate all terms of `field` in order.
    fn field_dict(&self, field: &str) -> Result<Box<dyn FieldDict>>;

    /// Iterate the terms of `field` in `[start, end]`. Empty bounds are open.
    fn field_dict_range(&self, field: &str, start: &[u8], end: &[u8])
    -> Result<Box<dyn FieldDict>>;

    /// Iterate the terms of `field` starting with `prefix`.
    fn field_dict_prefix(&self, field: &str, prefix: &[u8]) -> Result<Box<dyn FieldDict>>;

    /// Number of live documents.
    fn doc_count(&self) -> Result<u64>;

    /// Map an internal id back to the external document id.
    fn external_id(&self, id: &IndexInternalId) -> Result<String>;

    /// Map an external document id to its internal id, if the document exists.
    fn internal_id(&self, id: &str) -> Result<Option<IndexInternalId>>;

    /// Visit every indexed term of the given fields for one document.
    fn document_visit_field_terms(
        &self,
        id: &IndexInternalId,
        fields: &[&str],
        visitor: &mut dyn FnMut(&str, &[u8]),
    ) -> Result<()>;

    /// Visit the stored doc values of `field` for one document.
    fn visit_doc_values(
        &self,
        id: &IndexInternalId,
        field: &str,
        visitor: &mut dyn FnMut(&[u8]),
    ) -> Result<()>;
}
