//! Search hits and the term locations they carry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::index::IndexInternalId;
use crate::search::explanation::Explanation;

/// Where a term occurred inside a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub pos: u64,
    pub start: u64,
    pub end: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub array_positions: Vec<u64>,
}

impl Location {
    /// True if both locations point into the same element of an array field.
    pub fn same_array_element(&self, other: &Location) -> bool {
        self.array_positions == other.array_positions
    }
}

/// Locations keyed by term.
pub type TermLocationMap = BTreeMap<String, Vec<Location>>;

/// Term locations keyed by field.
pub type FieldTermLocationMap = BTreeMap<String, TermLocationMap>;

/// Append a location for `term`.
pub fn add_location(map: &mut TermLocationMap, term: &str, location: Location) {
    map.entry(term.to_string()).or_default().push(location);
}

/// Merge `other` into `into`. A term present in both keeps `other`'s
/// locations: one term in one document cannot have different locations.
pub fn merge_term_location_maps(into: &mut TermLocationMap, other: TermLocationMap) {
    for (term, locations) in other {
        into.insert(term, locations);
    }
}

/// Merge field/term location maps field by field.
pub fn merge_locations(into: &mut FieldTermLocationMap, other: FieldTermLocationMap) {
    for (field, term_locations) in other {
        match into.get_mut(&field) {
            Some(existing) => merge_term_location_maps(existing, term_locations),
            None => {
                into.insert(field, term_locations);
            }
        }
    }
}

/// One document matched by a searcher.
///
/// Matches are handed out by a [`crate::search::DocumentMatchPool`] and
/// should go back to it once superseded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentMatch {
    /// External document id, filled in by the collector.
    pub id: String,
    #[serde(skip)]
    pub index_internal_id: IndexInternalId,
    pub score: f64,
    #[serde(rename = "explanation", skip_serializing_if = "Option::is_none")]
    pub expl: Option<Explanation>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: FieldTermLocationMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    /// Order in which the collector saw this match.
    #[serde(skip)]
    pub hit_number: u64,
}

impl DocumentMatch {
    /// Record a stored field value. Repeated names collect into an array.
    pub fn add_field_value<S: Into<String>>(&mut self, name: S, value: Value) {
        let name = name.into();
        match self.fields.get_mut(&name) {
            None => {
                self.fields.insert(name, value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    /// Clear the match for reuse, keeping the id allocation.
    pub fn reset(&mut self) {
        let mut internal_id = std::mem::take(&mut self.index_internal_id);
        internal_id.clear();
        *self = DocumentMatch {
            index_internal_id: internal_id,
            ..Default::default()
        };
    }
}

impl fmt::Display for DocumentMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{:.6}]", self.index_internal_id, self.score)
    }
}
