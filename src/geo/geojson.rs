//! GeoJSON parsing and marshalling, plus the doc-value wire form.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::distance::parse_distance;
use super::shape::{
    CIRCLE_TYPE, ENVELOPE_TYPE, GEOMETRY_COLLECTION_TYPE, GeoShape, LINE_STRING_TYPE,
    MULTI_LINE_STRING_TYPE, MULTI_POINT_TYPE, MULTI_POLYGON_TYPE, POINT_TYPE, POLYGON_TYPE,
    Position,
};
use crate::error::{LancetError, Result};

/// Prefix written in front of every shape doc value.
pub const GLUE_BYTES: &[u8] = b"##";

fn coordinates<T: DeserializeOwned>(object: &Map<String, Value>) -> Result<T> {
    let value = object.get("coordinates").cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(value)?)
}

fn shape_type(object: &Map<String, Value>) -> String {
    object
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

// Parse one of the plain GeoJSON geometry types.
fn parse_geometry(typ: &str, object: &Map<String, Value>) -> Result<Option<GeoShape>> {
    let shape = match typ {
        POINT_TYPE => GeoShape::point(coordinates(object)?)?,
        MULTI_POINT_TYPE => GeoShape::multi_point(coordinates(object)?)?,
        LINE_STRING_TYPE => GeoShape::line_string(coordinates(object)?)?,
        MULTI_LINE_STRING_TYPE => GeoShape::multi_line_string(coordinates(object)?)?,
        POLYGON_TYPE => GeoShape::polygon(coordinates(object)?)?,
        MULTI_POLYGON_TYPE => GeoShape::multi_polygon(coordinates(object)?)?,
        _ => return Ok(None),
    };
    Ok(Some(shape))
}

fn parse_object(object: &Map<String, Value>) -> Result<GeoShape> {
    let typ = shape_type(object);
    if let Some(shape) = parse_geometry(&typ, object)? {
        return Ok(shape);
    }

    match typ.as_str() {
        GEOMETRY_COLLECTION_TYPE => {
            let mut shapes = Vec::new();
            let geometries = object
                .get("geometries")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for geometry in geometries {
                let member = geometry.as_object().ok_or_else(|| {
                    LancetError::geo("geometry collection members must be objects")
                })?;
                // members without a type, or of a type a collection cannot
                // hold, are skipped
                if let Some(shape) = parse_geometry(&shape_type(member), member)? {
                    shapes.push(shape);
                }
            }
            Ok(GeoShape::geometry_collection(shapes))
        }
        CIRCLE_TYPE => {
            let center: Position = coordinates(object)?;
            let radius = match object.get("radius").and_then(Value::as_str) {
                Some(radius) if !radius.is_empty() => parse_distance(radius)?,
                _ => object
                    .get("radiusInMeters")
                    .and_then(Value::as_f64)
                    .unwrap_or_default(),
            };
            GeoShape::circle(center, radius)
        }
        ENVELOPE_TYPE => GeoShape::envelope(coordinates(object)?),
        _ => Err(LancetError::UnknownShapeType(typ)),
    }
}

/// Parse a GeoJSON shape (or the `circle`/`envelope` extensions).
///
/// The `type` member is matched case-insensitively.
pub fn parse_geojson_shape(input: &[u8]) -> Result<GeoShape> {
    let value: Value = serde_json::from_slice(input)?;
    let object = value
        .as_object()
        .ok_or_else(|| LancetError::geo("geojson shape must be an object"))?;
    parse_object(object)
}

impl GeoShape {
    /// GeoJSON object for this shape.
    pub fn to_geojson(&self) -> Value {
        match self {
            GeoShape::GeometryCollection(gc) => json!({
                "type": GEOMETRY_COLLECTION_TYPE,
                "geometries": gc.shapes().iter().map(GeoShape::to_geojson).collect::<Vec<_>>(),
            }),
            GeoShape::Circle(c) => json!({
                "type": CIRCLE_TYPE,
                "coordinates": c.center(),
                "radiusInMeters": c.radius_in_meters(),
            }),
            GeoShape::BoundedRectangle(r) => json!({
                "type": self.shape_type(),
                "minLat": r.min_lat,
                "minLon": r.min_lon,
                "maxLat": r.max_lat,
                "maxLon": r.max_lon,
            }),
            GeoShape::BoundedPolygon(p) => json!({
                "type": self.shape_type(),
                "coordinates": p.coordinates.iter().map(|(lon, lat)| [*lon, *lat]).collect::<Vec<_>>(),
            }),
            GeoShape::PointDistance(p) => json!({
                "type": self.shape_type(),
                "centerLat": p.center_lat,
                "centerLon": p.center_lon,
                "dist": p.dist,
            }),
            _ => json!({
                "type": self.shape_type(),
                "coordinates": self.coordinates(),
            }),
        }
    }

    /// Serialized GeoJSON bytes.
    pub fn marshal_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_geojson())?)
    }

    /// The doc value stored for a shape field: glue bytes then GeoJSON.
    pub fn to_doc_value(&self) -> Result<Vec<u8>> {
        let json = self.marshal_json()?;
        let mut value = Vec::with_capacity(GLUE_BYTES.len() + json.len());
        value.extend_from_slice(GLUE_BYTES);
        value.extend_from_slice(&json);
        Ok(value)
    }
}

fn missing_coordinates() -> LancetError {
    LancetError::geo("missing coordinates")
}

/// Build a shape from coordinates nested four levels deep, whatever the
/// type's own depth, and return it with its doc value.
///
/// Points read `c[0][0][0]`, multipoints, linestrings and envelopes read
/// `c[0][0]`, multilinestrings and polygons read `c[0]`, multipolygons take
/// everything.
pub fn new_geo_json_shape(
    coordinates: &[Vec<Vec<Position>>],
    typ: &str,
) -> Result<(GeoShape, Vec<u8>)> {
    let first = coordinates.first().ok_or_else(missing_coordinates)?;
    let typ = typ.to_lowercase();

    let shape = match typ.as_str() {
        POINT_TYPE => {
            let point = first
                .first()
                .and_then(|line| line.first())
                .ok_or_else(missing_coordinates)?;
            GeoShape::point(point.clone())?
        }
        MULTI_POINT_TYPE | LINE_STRING_TYPE | ENVELOPE_TYPE => {
            let line = first.first().ok_or_else(missing_coordinates)?.clone();
            match typ.as_str() {
                MULTI_POINT_TYPE => GeoShape::multi_point(line)?,
                LINE_STRING_TYPE => GeoShape::line_string(line)?,
                _ => GeoShape::envelope(line)?,
            }
        }
        MULTI_LINE_STRING_TYPE => GeoShape::multi_line_string(first.clone())?,
        POLYGON_TYPE => GeoShape::polygon(first.clone())?,
        MULTI_POLYGON_TYPE => GeoShape::multi_polygon(coordinates.to_vec())?,
        _ => return Err(LancetError::UnknownShapeType(typ)),
    };

    let value = shape.to_doc_value()?;
    Ok((shape, value))
}

/// Build a geometry collection from per-member coordinates and types.
///
/// Members that fail to build are left out.
pub fn new_geometry_collection(
    coordinates: &[Vec<Vec<Vec<Position>>>],
    types: &[&str],
) -> Result<(GeoShape, Vec<u8>)> {
    let shapes = coordinates
        .iter()
        .zip(types)
        .filter_map(|(vertices, typ)| new_geo_json_shape(vertices, typ).ok())
        .map(|(shape, _)| shape)
        .collect();
    let collection = GeoShape::geometry_collection(shapes);
    let value = collection.to_doc_value()?;
    Ok((collection, value))
}

/// Build a circle shape and its doc value.
pub fn new_geo_circle_shape(center: Position, radius_in_meters: f64) -> Result<(GeoShape, Vec<u8>)> {
    let circle = GeoShape::circle(center, radius_in_meters)?;
    let value = circle.to_doc_value()?;
    Ok((circle, value))
}

/// Pull a `(lon, lat)` pair out of a JSON value.
///
/// Accepts a two-element `[lon, lat]` array, a `"lat,lon"` string, or an
/// object with `lon` (or `lng`) and `lat` members.
pub fn extract_geo_point(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Array(items) if items.len() == 2 => Some((items[0].as_f64()?, items[1].as_f64()?)),
        Value::String(s) => {
            let (lat, lon) = s.split_once(',')?;
            let lat = lat.trim().parse().ok()?;
            let lon = lon.trim().parse().ok()?;
            Some((lon, lat))
        }
        Value::Object(map) => {
            let lon = map.get("lon").or_else(|| map.get("lng"))?.as_f64()?;
            let lat = map.get("lat")?.as_f64()?;
            Some((lon, lat))
        }
        _ => None,
    }
}
