//! Row layouts of the upside-down index.
//!
//! | row            | key                                         | value                 |
//! |----------------|---------------------------------------------|-----------------------|
//! | field          | `f` field-id                                | field name            |
//! | dictionary     | `d` field-id term                           | doc frequency (u64)   |
//! | term frequency | `t` field-id term `0xff` doc-id             | [`TermFrequencyValue`]|
//! | back index     | `b` doc-id                                  | [`BackIndexValue`]    |
//!
//! Field ids are big-endian `u16`, so rows of one field sort together and
//! postings of one term sort by document id.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{LancetError, Result};

pub const FIELD_ROW: u8 = b'f';
pub const DICTIONARY_ROW: u8 = b'd';
pub const TERM_FREQUENCY_ROW: u8 = b't';
pub const BACK_INDEX_ROW: u8 = b'b';

/// Separates the term from the document id in term frequency keys.
pub const TERM_SEPARATOR: u8 = 0xff;

fn row_key(kind: u8, field: u16, capacity: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(3 + capacity);
    key.push(kind);
    // Writing into a Vec cannot fail.
    let _ = key.write_u16::<BigEndian>(field);
    key
}

pub fn field_key(field: u16) -> Vec<u8> {
    row_key(FIELD_ROW, field, 0)
}

/// Decode the field id of a field row key.
pub fn parse_field_key(key: &[u8]) -> Result<u16> {
    if key.len() != 3 || key[0] != FIELD_ROW {
        return Err(LancetError::index("malformed field row key"));
    }
    Ok(BigEndian::read_u16(&key[1..]))
}

pub fn dictionary_prefix(field: u16) -> Vec<u8> {
    row_key(DICTIONARY_ROW, field, 0)
}

pub fn dictionary_key(field: u16, term: &[u8]) -> Vec<u8> {
    let mut key = row_key(DICTIONARY_ROW, field, term.len());
    key.extend_from_slice(term);
    key
}

/// Prefix shared by every posting of `term` in `field`.
pub fn term_frequency_prefix(field: u16, term: &[u8]) -> Vec<u8> {
    let mut key = row_key(TERM_FREQUENCY_ROW, field, term.len() + 1);
    key.extend_from_slice(term);
    key.push(TERM_SEPARATOR);
    key
}

pub fn term_frequency_key(field: u16, term: &[u8], doc: &[u8]) -> Vec<u8> {
    let mut key = term_frequency_prefix(field, term);
    key.extend_from_slice(doc);
    key
}

pub fn back_index_prefix() -> Vec<u8> {
    vec![BACK_INDEX_ROW]
}

pub fn back_index_key(doc: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(doc.len() + 1);
    key.push(BACK_INDEX_ROW);
    key.extend_from_slice(doc);
    key
}

pub fn encode_count(count: u64) -> Vec<u8> {
    let mut buf = vec![0u8; 8];
    BigEndian::write_u64(&mut buf, count);
    buf
}

pub fn decode_count(value: &[u8]) -> Result<u64> {
    if value.len() != 8 {
        return Err(LancetError::index("malformed dictionary row value"));
    }
    Ok(BigEndian::read_u64(value))
}

/// A term vector entry as stored in a term frequency row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTermVector {
    pub field: u16,
    pub pos: u64,
    pub start: u64,
    pub end: u64,
    pub array_positions: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFrequencyValue {
    pub freq: u64,
    pub norm: f32,
    pub vectors: Vec<StoredTermVector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackIndexTermEntry {
    pub field: u16,
    pub term: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackIndexDocValue {
    pub field: u16,
    pub value: Vec<u8>,
}

/// Everything written for a document, so it can be removed again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackIndexValue {
    pub terms: Vec<BackIndexTermEntry>,
    pub doc_values: Vec<BackIndexDocValue>,
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

pub fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}
