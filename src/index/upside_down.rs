//! An upside-down inverted index stored in an ordered key-value store.
//!
//! Every posting is its own row, keyed so that postings of one term sort by
//! document id. Readers work on a store snapshot and iterate those rows
//! directly, so `advance` is a seek on the underlying iterator.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, trace};
use parking_lot::{Mutex, RwLock};

use crate::analysis::analyzer::Analyzer;
use crate::config::IndexConfig;
use crate::error::{LancetError, Result};
use crate::geo;
use crate::index::IndexInternalId;
use crate::index::document::{Document, Field};
use crate::index::reader::{
    DictEntry, DocIdReader, FieldDict, FreqNormFilter, IndexReader, TermFieldDoc,
    TermFieldReader, TermFieldVector,
};
use crate::index::rows::{
    self, BackIndexDocValue, BackIndexTermEntry, BackIndexValue, StoredTermVector,
    TermFrequencyValue,
};
use crate::numeric::{PrefixCoded, float64_to_int64};
use crate::storage::{KvBatch, KvIterator, KvReader, KvStore, KvWriter, MemoryKvStore};

/// Shift step between the prefix-coded terms of a numeric value.
pub const NUMERIC_PRECISION_STEP: u32 = 4;

/// Shift step between the prefix-coded terms of a geo point.
pub const GEO_PRECISION_STEP: u32 = 9;

#[derive(Debug, Clone, Default)]
struct FieldCache {
    by_name: AHashMap<String, u16>,
    names: Vec<String>,
}

impl FieldCache {
    fn id(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    fn name(&self, id: u16) -> &str {
        self.names.get(id as usize).map(String::as_str).unwrap_or("")
    }

    fn id_or_create(&mut self, name: &str, batch: &mut KvBatch) -> Result<u16> {
        if let Some(id) = self.id(name) {
            return Ok(id);
        }
        let id = u16::try_from(self.names.len())
            .map_err(|_| LancetError::index("too many distinct fields"))?;
        self.by_name.insert(name.to_string(), id);
        self.names.push(name.to_string());
        batch.set(rows::field_key(id), name.as_bytes().to_vec());
        Ok(id)
    }
}

#[derive(Debug, Default)]
struct AnalyzedDocument {
    postings: BTreeMap<(u16, Vec<u8>), TermFrequencyValue>,
    doc_values: Vec<BackIndexDocValue>,
}

impl AnalyzedDocument {
    fn add_term(&mut self, field: u16, term: Vec<u8>, vector: Option<StoredTermVector>) {
        let entry = self
            .postings
            .entry((field, term))
            .or_insert_with(|| TermFrequencyValue {
                freq: 0,
                norm: 1.0,
                vectors: Vec::new(),
            });
        entry.freq += 1;
        if let Some(vector) = vector {
            entry.vectors.push(vector);
        }
    }
}

/// Prefix-coded terms of `value` at every shift of `step`.
fn prefix_coded_terms(value: i64, step: u32) -> Result<Vec<Vec<u8>>> {
    (0..64)
        .step_by(step as usize)
        .map(|shift| Ok(PrefixCoded::new_int64(value, shift)?.into_bytes()))
        .collect()
}

/// The index writer. Updates are serialized; readers are snapshots.
#[derive(Debug)]
pub struct UpsideDownIndex {
    store: Arc<dyn KvStore>,
    analyzer: Analyzer,
    config: IndexConfig,
    fields: RwLock<FieldCache>,
    writer: Mutex<Box<dyn KvWriter>>,
}

impl UpsideDownIndex {
    /// Open an index over `store`, loading any fields already recorded.
    pub fn new(store: Arc<dyn KvStore>, config: IndexConfig) -> Result<Self> {
        let analyzer = Analyzer::from_config(&config)?;

        let mut fields = FieldCache::default();
        let reader = store.reader()?;
        let mut iter = reader.prefix_iterator(&[rows::FIELD_ROW]);
        while let Some((key, value)) = iter.current() {
            let id = rows::parse_field_key(key)?;
            let name = String::from_utf8(value.to_vec())
                .map_err(|e| LancetError::index(format!("invalid field name: {e}")))?;
            if id as usize != fields.names.len() {
                return Err(LancetError::index(format!("field id {id} out of sequence")));
            }
            fields.by_name.insert(name.clone(), id);
            fields.names.push(name);
            iter.next();
        }
        iter.close()?;

        let writer = store.writer()?;
        Ok(UpsideDownIndex {
            store,
            analyzer,
            config,
            fields: RwLock::new(fields),
            writer: Mutex::new(writer),
        })
    }

    /// An empty index backed by a [`MemoryKvStore`] with default settings.
    pub fn in_memory() -> Result<Self> {
        Self::new(Arc::new(MemoryKvStore::new_default()), IndexConfig::default())
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Insert `doc`, replacing any previous version with the same id.
    pub fn update(&self, doc: &Document) -> Result<()> {
        let mut writer = self.writer.lock();
        let snapshot = self.store.reader()?;
        let mut batch = writer.new_batch();
        let mut fields = self.fields.read().clone();

        let analyzed = self.analyze(doc, &mut fields, &mut batch)?;

        let mut dict_deltas: BTreeMap<(u16, Vec<u8>), i64> = BTreeMap::new();
        self.remove_back_index(snapshot.as_ref(), &doc.id, &mut batch, &mut dict_deltas)?;

        let mut back_index = BackIndexValue {
            terms: Vec::with_capacity(analyzed.postings.len()),
            doc_values: analyzed.doc_values,
        };
        for ((field, term), value) in analyzed.postings {
            batch.set(
                rows::term_frequency_key(field, &term, doc.id.as_bytes()),
                rows::encode(&value)?,
            );
            *dict_deltas.entry((field, term.clone())).or_default() += 1;
            back_index.terms.push(BackIndexTermEntry { field, term });
        }

        let term_count = back_index.terms.len();
        apply_dictionary_deltas(snapshot.as_ref(), dict_deltas, &mut batch)?;
        batch.set(
            rows::back_index_key(doc.id.as_bytes()),
            rows::encode(&back_index)?,
        );

        writer.execute_batch(batch)?;
        *self.fields.write() = fields;
        debug!("indexed document {} with {term_count} terms", doc.id);
        Ok(())
    }

    /// Remove a document. Removing an unknown id is a no-op.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        let snapshot = self.store.reader()?;
        let mut batch = writer.new_batch();

        let mut dict_deltas = BTreeMap::new();
        if !self.remove_back_index(snapshot.as_ref(), id, &mut batch, &mut dict_deltas)? {
            return Ok(());
        }
        apply_dictionary_deltas(snapshot.as_ref(), dict_deltas, &mut batch)?;
        writer.execute_batch(batch)?;
        debug!("deleted document {id}");
        Ok(())
    }

    /// Open a reader over the current state of the index.
    pub fn reader(&self) -> Result<UpsideDownReader> {
        UpsideDownReader::open(
            Arc::from(self.store.reader()?),
            Arc::new(self.fields.read().clone()),
        )
    }

    /// Queue removal of a document's rows. Returns false if it was absent.
    fn remove_back_index(
        &self,
        snapshot: &dyn KvReader,
        id: &str,
        batch: &mut KvBatch,
        dict_deltas: &mut BTreeMap<(u16, Vec<u8>), i64>,
    ) -> Result<bool> {
        let key = rows::back_index_key(id.as_bytes());
        let Some(existing) = snapshot.get(&key)? else {
            return Ok(false);
        };
        let existing: BackIndexValue = rows::decode(&existing)?;
        for entry in existing.terms {
            batch.delete(rows::term_frequency_key(
                entry.field,
                &entry.term,
                id.as_bytes(),
            ));
            *dict_deltas.entry((entry.field, entry.term)).or_default() -= 1;
        }
        batch.delete(key);
        Ok(true)
    }

    fn analyze(
        &self,
        doc: &Document,
        fields: &mut FieldCache,
        batch: &mut KvBatch,
    ) -> Result<AnalyzedDocument> {
        let mut analyzed = AnalyzedDocument::default();
        let mut lengths: AHashMap<u16, u64> = AHashMap::new();

        let mut occurrences: AHashMap<&str, u64> = AHashMap::new();
        for field in &doc.fields {
            *occurrences.entry(field.name()).or_default() += 1;
        }
        let mut seen: AHashMap<&str, u64> = AHashMap::new();

        for field in &doc.fields {
            let name = field.name();
            let field_id = fields.id_or_create(name, batch)?;
            let occurrence = seen.entry(name).or_default();
            let array_positions = if occurrences.get(name).copied().unwrap_or(0) > 1 {
                vec![*occurrence]
            } else {
                Vec::new()
            };
            *occurrence += 1;

            let length = lengths.entry(field_id).or_default();
            match field {
                Field::Text {
                    value, term_vectors, ..
                } => {
                    let store_vectors = term_vectors.unwrap_or(self.config.store_term_vectors);
                    for token in self.analyzer.analyze(value)? {
                        let vector = store_vectors.then(|| StoredTermVector {
                            field: field_id,
                            pos: token.position as u64 + 1,
                            start: token.start_offset as u64,
                            end: token.end_offset as u64,
                            array_positions: array_positions.clone(),
                        });
                        analyzed.add_term(field_id, token.text.into_bytes(), vector);
                        *length += 1;
                    }
                }
                Field::Numeric { value, .. } => {
                    let terms =
                        prefix_coded_terms(float64_to_int64(*value), NUMERIC_PRECISION_STEP)?;
                    *length += terms.len() as u64;
                    for term in terms {
                        analyzed.add_term(field_id, term, None);
                    }
                }
                Field::DateTime { value, .. } => {
                    let nanos = value.timestamp_nanos_opt().ok_or_else(|| {
                        LancetError::invalid_argument(format!(
                            "date {value} is outside the representable range"
                        ))
                    })?;
                    let terms = prefix_coded_terms(nanos, NUMERIC_PRECISION_STEP)?;
                    *length += terms.len() as u64;
                    for term in terms {
                        analyzed.add_term(field_id, term, None);
                    }
                }
                Field::GeoPoint { lon, lat, .. } => {
                    if !(-180.0..=180.0).contains(lon) || !(-90.0..=90.0).contains(lat) {
                        return Err(LancetError::geo(format!(
                            "invalid geo point lon: {lon}, lat: {lat}"
                        )));
                    }
                    let hash = geo::morton_hash(*lon, *lat) as i64;
                    let terms = prefix_coded_terms(hash, GEO_PRECISION_STEP)?;
                    *length += terms.len() as u64;
                    for term in terms {
                        analyzed.add_term(field_id, term, None);
                    }
                }
                Field::GeoShape { shape, .. } => {
                    analyzed.add_term(field_id, shape.shape_type().as_bytes().to_vec(), None);
                    analyzed.doc_values.push(BackIndexDocValue {
                        field: field_id,
                        value: shape.to_doc_value()?,
                    });
                    *length += 1;
                }
            }
        }

        for ((field, _), value) in analyzed.postings.iter_mut() {
            let length = lengths.get(field).copied().unwrap_or(1).max(1);
            value.norm = (1.0 / (length as f64).sqrt()) as f32;
        }
        Ok(analyzed)
    }
}

fn apply_dictionary_deltas(
    snapshot: &dyn KvReader,
    deltas: BTreeMap<(u16, Vec<u8>), i64>,
    batch: &mut KvBatch,
) -> Result<()> {
    for ((field, term), delta) in deltas {
        if delta == 0 {
            continue;
        }
        let key = rows::dictionary_key(field, &term);
        let current = match snapshot.get(&key)? {
            Some(value) => rows::decode_count(&value)? as i64,
            None => 0,
        };
        let updated = current + delta;
        if updated > 0 {
            batch.set(key, rows::encode_count(updated as u64));
        } else {
            batch.delete(key);
        }
    }
    Ok(())
}

/// A snapshot reader over an [`UpsideDownIndex`].
#[derive(Debug, Clone)]
pub struct UpsideDownReader {
    kv: Arc<dyn KvReader>,
    fields: Arc<FieldCache>,
    doc_count: u64,
}

impl UpsideDownReader {
    fn open(kv: Arc<dyn KvReader>, fields: Arc<FieldCache>) -> Result<Self> {
        let mut doc_count = 0;
        let mut iter = kv.prefix_iterator(&rows::back_index_prefix());
        while iter.valid() {
            doc_count += 1;
            iter.next();
        }
        iter.close()?;
        trace!("opened index reader over {doc_count} documents");
        Ok(UpsideDownReader {
            kv,
            fields,
            doc_count,
        })
    }

    fn back_index(&self, id: &[u8]) -> Result<Option<BackIndexValue>> {
        match self.kv.get(&rows::back_index_key(id))? {
            Some(bytes) => Ok(Some(rows::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn dict(
        &self,
        field: &str,
        prefix: &[u8],
        start: &[u8],
        end: Option<Vec<u8>>,
    ) -> Box<dyn FieldDict> {
        let Some(field_id) = self.fields.id(field) else {
            return Box::new(UpsideDownFieldDict::empty());
        };
        let mut iter = self.kv.prefix_iterator(&rows::dictionary_key(field_id, prefix));
        if !start.is_empty() {
            iter.seek(&rows::dictionary_key(field_id, start));
        }
        Box::new(UpsideDownFieldDict {
            iter: Some(iter),
            key_offset: rows::dictionary_prefix(field_id).len(),
            end,
        })
    }
}

impl IndexReader for UpsideDownReader {
    fn term_field_reader(
        &self,
        term: &[u8],
        field: &str,
        include_freq: bool,
        include_norm: bool,
        include_term_vectors: bool,
    ) -> Result<Box<dyn TermFieldReader>> {
        let Some(field_id) = self.fields.id(field) else {
            return Ok(Box::new(UpsideDownTermFieldReader::empty(term)));
        };

        let count = match self.kv.get(&rows::dictionary_key(field_id, term))? {
            Some(value) => rows::decode_count(&value)?,
            None => 0,
        };
        let prefix = rows::term_frequency_prefix(field_id, term);
        let iter = self.kv.prefix_iterator(&prefix);
        Ok(Box::new(UpsideDownTermFieldReader {
            iter: Some(iter),
            prefix,
            term: term.to_vec(),
            count,
            fields: Arc::clone(&self.fields),
            include_freq,
            include_norm,
            include_term_vectors,
        }))
    }

    fn doc_id_reader_all(&self) -> Result<Box<dyn DocIdReader>> {
        Ok(Box::new(AllDocIdReader {
            iter: self.kv.prefix_iterator(&rows::back_index_prefix()),
            count: self.doc_count,
        }))
    }

    fn doc_id_reader_only(&self, ids: &[String]) -> Result<Box<dyn DocIdReader>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if self.kv.get(&rows::back_index_key(id.as_bytes()))?.is_some() {
                found.push(IndexInternalId::from(id.as_str()));
            }
        }
        found.sort();
        found.dedup();
        Ok(Box::new(ListDocIdReader { ids: found, pos: 0 }))
    }

    fn field_dict(&self, field: &str) -> Result<Box<dyn FieldDict>> {
        Ok(self.dict(field, b"", b"", None))
    }

    fn field_dict_range(
        &self,
        field: &str,
        start: &[u8],
        end: &[u8],
    ) -> Result<Box<dyn FieldDict>> {
        let end = (!end.is_empty()).then(|| end.to_vec());
        Ok(self.dict(field, b"", start, end))
    }

    fn field_dict_prefix(&self, field: &str, prefix: &[u8]) -> Result<Box<dyn FieldDict>> {
        Ok(self.dict(field, prefix, b"", None))
    }

    fn doc_count(&self) -> Result<u64> {
        Ok(self.doc_count)
    }

    fn external_id(&self, id: &IndexInternalId) -> Result<String> {
        String::from_utf8(id.as_bytes().to_vec())
            .map_err(|e| LancetError::index(format!("invalid document id: {e}")))
    }

    fn internal_id(&self, id: &str) -> Result<Option<IndexInternalId>> {
        Ok(self
            .kv
            .get(&rows::back_index_key(id.as_bytes()))?
            .map(|_| IndexInternalId::from(id)))
    }

    fn document_visit_field_terms(
        &self,
        id: &IndexInternalId,
        fields: &[&str],
        visitor: &mut dyn FnMut(&str, &[u8]),
    ) -> Result<()> {
        let Some(back_index) = self.back_index(id.as_bytes())? else {
            return Ok(());
        };
        let wanted: Vec<(u16, &str)> = fields
            .iter()
            .filter_map(|name| self.fields.id(name).map(|id| (id, *name)))
            .collect();
        for entry in &back_index.terms {
            if let Some((_, name)) = wanted.iter().find(|(id, _)| *id == entry.field) {
                visitor(name, &entry.term);
            }
        }
        Ok(())
    }

    fn visit_doc_values(
        &self,
        id: &IndexInternalId,
        field: &str,
        visitor: &mut dyn FnMut(&[u8]),
    ) -> Result<()> {
        let Some(field_id) = self.fields.id(field) else {
            return Ok(());
        };
        if let Some(back_index) = self.back_index(id.as_bytes())? {
            for doc_value in back_index.doc_values.iter().filter(|v| v.field == field_id) {
                visitor(&doc_value.value);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct UpsideDownTermFieldReader {
    iter: Option<Box<dyn KvIterator>>,
    prefix: Vec<u8>,
    term: Vec<u8>,
    count: u64,
    fields: Arc<FieldCache>,
    include_freq: bool,
    include_norm: bool,
    include_term_vectors: bool,
}

impl UpsideDownTermFieldReader {
    fn empty(term: &[u8]) -> Self {
        UpsideDownTermFieldReader {
            iter: None,
            prefix: Vec::new(),
            term: term.to_vec(),
            count: 0,
            fields: Arc::new(FieldCache::default()),
            include_freq: false,
            include_norm: false,
            include_term_vectors: false,
        }
    }

    fn build(&self, doc: &[u8], value: TermFrequencyValue, reuse: Option<TermFieldDoc>) -> TermFieldDoc {
        let mut tfd = reuse.unwrap_or_default();
        tfd.reset();
        tfd.term.extend_from_slice(&self.term);
        tfd.id.set(doc);
        if self.include_freq {
            tfd.freq = value.freq;
        }
        if self.include_norm {
            tfd.norm = value.norm as f64;
        }
        if self.include_term_vectors {
            tfd.vectors.extend(value.vectors.into_iter().map(|v| TermFieldVector {
                field: self.fields.name(v.field).to_string(),
                array_positions: v.array_positions,
                pos: v.pos,
                start: v.start,
                end: v.end,
            }));
        }
        tfd
    }
}

impl TermFieldReader for UpsideDownTermFieldReader {
    fn next(
        &mut self,
        mut reuse: Option<TermFieldDoc>,
        mut filter: Option<FreqNormFilter<'_>>,
    ) -> Result<Option<TermFieldDoc>> {
        let Some(mut iter) = self.iter.take() else {
            return Ok(None);
        };

        let mut result = Ok(None);
        while let Some((key, value)) = iter.current() {
            let decoded: TermFrequencyValue = match rows::decode(value) {
                Ok(decoded) => decoded,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            };
            let keep = match filter.as_mut() {
                Some(filter) => filter(decoded.freq, decoded.norm as f64),
                None => true,
            };
            let tfd = keep.then(|| self.build(&key[self.prefix.len()..], decoded, reuse.take()));
            iter.next();
            if let Some(tfd) = tfd {
                result = Ok(Some(tfd));
                break;
            }
        }

        self.iter = Some(iter);
        result
    }

    fn advance(
        &mut self,
        id: &IndexInternalId,
        reuse: Option<TermFieldDoc>,
    ) -> Result<Option<TermFieldDoc>> {
        if let Some(iter) = self.iter.as_mut() {
            let mut key = self.prefix.clone();
            key.extend_from_slice(id.as_bytes());
            iter.seek(&key);
        }
        self.next(reuse, None)
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut iter) = self.iter.take() {
            iter.close()?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct AllDocIdReader {
    iter: Box<dyn KvIterator>,
    count: u64,
}

impl DocIdReader for AllDocIdReader {
    fn next(&mut self) -> Result<Option<IndexInternalId>> {
        let id = self.iter.key().map(|key| IndexInternalId::new(&key[1..]));
        if id.is_some() {
            self.iter.next();
        }
        Ok(id)
    }

    fn advance(&mut self, id: &IndexInternalId) -> Result<Option<IndexInternalId>> {
        self.iter.seek(&rows::back_index_key(id.as_bytes()));
        self.next()
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn close(&mut self) -> Result<()> {
        self.iter.close()
    }
}

#[derive(Debug)]
struct ListDocIdReader {
    ids: Vec<IndexInternalId>,
    pos: usize,
}

impl DocIdReader for ListDocIdReader {
    fn next(&mut self) -> Result<Option<IndexInternalId>> {
        let id = self.ids.get(self.pos).cloned();
        if id.is_some() {
            self.pos += 1;
        }
        Ok(id)
    }

    fn advance(&mut self, id: &IndexInternalId) -> Result<Option<IndexInternalId>> {
        let skip = self.ids[self.pos..].partition_point(|candidate| candidate < id);
        self.pos += skip;
        self.next()
    }

    fn count(&self) -> u64 {
        self.ids.len() as u64
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct UpsideDownFieldDict {
    iter: Option<Box<dyn KvIterator>>,
    key_offset: usize,
    end: Option<Vec<u8>>,
}

impl UpsideDownFieldDict {
    fn empty() -> Self {
        UpsideDownFieldDict {
            iter: None,
            key_offset: 0,
            end: None,
        }
    }
}

impl FieldDict for UpsideDownFieldDict {
    fn next(&mut self) -> Result<Option<DictEntry>> {
        let Some(iter) = self.iter.as_mut() else {
            return Ok(None);
        };
        let Some((key, value)) = iter.current() else {
            return Ok(None);
        };
        let term = key[self.key_offset..].to_vec();
        if let Some(end) = &self.end {
            if term.as_slice() > end.as_slice() {
                return Ok(None);
            }
        }
        let count = rows::decode_count(value)?;
        iter.next();
        Ok(Some(DictEntry { term, count }))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut iter) = self.iter.take() {
            iter.close()?;
        }
        Ok(())
    }
}
