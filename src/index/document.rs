//! Documents and fields accepted by the index writer.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{LancetError, Result};
use crate::geo::{self, GeoShape};

/// A single indexed field value.
#[derive(Debug, Clone)]
pub enum Field {
    /// Analyzed text. `term_vectors` overrides the index default when set.
    Text {
        name: String,
        value: String,
        term_vectors: Option<bool>,
    },
    /// A number indexed as prefix-coded terms.
    Numeric { name: String, value: f64 },
    /// A timestamp indexed as prefix-coded nanoseconds.
    DateTime { name: String, value: DateTime<Utc> },
    /// A point indexed as prefix-coded morton hashes.
    GeoPoint { name: String, lon: f64, lat: f64 },
    /// A shape kept as a doc value and filtered at query time.
    GeoShape { name: String, shape: GeoShape },
}

impl Field {
    pub fn text<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Field::Text {
            name: name.into(),
            value: value.into(),
            term_vectors: None,
        }
    }

    pub fn numeric<N: Into<String>>(name: N, value: f64) -> Self {
        Field::Numeric {
            name: name.into(),
            value,
        }
    }

    pub fn date_time<N: Into<String>>(name: N, value: DateTime<Utc>) -> Self {
        Field::DateTime {
            name: name.into(),
            value,
        }
    }

    pub fn geo_point<N: Into<String>>(name: N, lon: f64, lat: f64) -> Self {
        Field::GeoPoint {
            name: name.into(),
            lon,
            lat,
        }
    }

    pub fn geo_shape<N: Into<String>>(name: N, shape: GeoShape) -> Self {
        Field::GeoShape {
            name: name.into(),
            shape,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Field::Text { name, .. }
            | Field::Numeric { name, .. }
            | Field::DateTime { name, .. }
            | Field::GeoPoint { name, .. }
            | Field::GeoShape { name, .. } => name,
        }
    }
}

/// A document: an external id and its fields.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Vec<Field>,
}

impl Document {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Document {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field addition.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Map a JSON object onto fields.
    ///
    /// Strings become text, numbers become numeric fields, objects with a
    /// GeoJSON `type` become shapes, other objects and two-element number
    /// arrays that look like points become geo points. Arrays of values
    /// repeat the field.
    pub fn from_json<S: Into<String>>(id: S, value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| LancetError::invalid_argument("document must be a JSON object"))?;

        let mut doc = Document::new(id);
        for (name, value) in object {
            doc.add_json_value(name, value)?;
        }
        Ok(doc)
    }

    fn add_json_value(&mut self, name: &str, value: &Value) -> Result<()> {
        match value {
            Value::String(s) => self.add_field(Field::text(name, s.clone())),
            Value::Number(n) => {
                if let Some(v) = n.as_f64() {
                    self.add_field(Field::numeric(name, v));
                }
            }
            Value::Object(map) if map.contains_key("type") => {
                let shape = geo::parse_geojson_shape(&serde_json::to_vec(value)?)?;
                self.add_field(Field::geo_shape(name, shape));
            }
            Value::Array(items) => {
                if let Some((lon, lat)) = geo::extract_geo_point(value) {
                    self.add_field(Field::geo_point(name, lon, lat));
                } else {
                    for item in items {
                        self.add_json_value(name, item)?;
                    }
                }
            }
            Value::Object(_) => {
                if let Some((lon, lat)) = geo::extract_geo_point(value) {
                    self.add_field(Field::geo_point(name, lon, lat));
                }
            }
            Value::Bool(_) | Value::Null => {}
        }
        Ok(())
    }
}
