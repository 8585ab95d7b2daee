//! GeoJSON shape types.
//!
//! Shapes are immutable once built. Each one derives its spherical
//! primitive on the first predicate call and keeps it for later calls.

use std::sync::OnceLock;

use serde::Serialize;

use super::sphere::{self, Cap, LatLngRect, Polyline, SpherePoint};
use crate::error::{LancetError, Result};

pub const POINT_TYPE: &str = "point";
pub const MULTI_POINT_TYPE: &str = "multipoint";
pub const LINE_STRING_TYPE: &str = "linestring";
pub const MULTI_LINE_STRING_TYPE: &str = "multilinestring";
pub const POLYGON_TYPE: &str = "polygon";
pub const MULTI_POLYGON_TYPE: &str = "multipolygon";
pub const GEOMETRY_COLLECTION_TYPE: &str = "geometrycollection";
pub const CIRCLE_TYPE: &str = "circle";
pub const ENVELOPE_TYPE: &str = "envelope";

/// A GeoJSON position: `[lon, lat]`, optionally followed by altitude.
pub type Position = Vec<f64>;

fn validate_position(position: &[f64]) -> Result<()> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(()),
        [_, _, ..] => Err(LancetError::geo(format!(
            "non-finite coordinates in position {position:?}"
        ))),
        _ => Err(LancetError::geo(format!(
            "position needs at least 2 values, got {}",
            position.len()
        ))),
    }
}

fn validate_line(line: &[Position]) -> Result<()> {
    if line.len() < 2 {
        return Err(LancetError::geo(format!(
            "linestring needs at least 2 positions, got {}",
            line.len()
        )));
    }
    line.iter().try_for_each(|p| validate_position(p))
}

fn validate_rings(rings: &[Vec<Position>]) -> Result<()> {
    if rings.is_empty() {
        return Err(LancetError::geo("polygon needs at least one ring"));
    }
    for ring in rings {
        if ring.len() < 3 {
            return Err(LancetError::geo(format!(
                "polygon ring needs at least 3 positions, got {}",
                ring.len()
            )));
        }
        ring.iter().try_for_each(|p| validate_position(p))?;
    }
    Ok(())
}

/// Coordinates of a shape, at whatever nesting depth its type uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Coordinates {
    Position(Position),
    Line(Vec<Position>),
    Rings(Vec<Vec<Position>>),
    Polygons(Vec<Vec<Vec<Position>>>),
}

#[derive(Debug, Clone)]
pub struct Point {
    vertices: Position,
    cell: OnceLock<SpherePoint>,
}

impl Point {
    pub fn new(vertices: Position) -> Result<Self> {
        validate_position(&vertices)?;
        Ok(Point {
            vertices,
            cell: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.vertices
    }

    pub(crate) fn cell(&self) -> &SpherePoint {
        self.cell
            .get_or_init(|| SpherePoint::from_position(&self.vertices))
    }
}

#[derive(Debug, Clone)]
pub struct MultiPoint {
    vertices: Vec<Position>,
    cells: OnceLock<Vec<SpherePoint>>,
}

impl MultiPoint {
    pub fn new(vertices: Vec<Position>) -> Result<Self> {
        vertices.iter().try_for_each(|p| validate_position(p))?;
        Ok(MultiPoint {
            vertices,
            cells: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.vertices
    }

    pub(crate) fn cells(&self) -> &[SpherePoint] {
        self.cells.get_or_init(|| {
            self.vertices
                .iter()
                .map(|p| SpherePoint::from_position(p))
                .collect()
        })
    }
}

#[derive(Debug, Clone)]
pub struct LineString {
    vertices: Vec<Position>,
    polyline: OnceLock<Polyline>,
}

impl LineString {
    pub fn new(vertices: Vec<Position>) -> Result<Self> {
        validate_line(&vertices)?;
        Ok(LineString {
            vertices,
            polyline: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.vertices
    }

    pub(crate) fn polyline(&self) -> &Polyline {
        self.polyline
            .get_or_init(|| Polyline::from_positions(&self.vertices))
    }
}

#[derive(Debug, Clone)]
pub struct MultiLineString {
    vertices: Vec<Vec<Position>>,
    polylines: OnceLock<Vec<Polyline>>,
}

impl MultiLineString {
    pub fn new(vertices: Vec<Vec<Position>>) -> Result<Self> {
        vertices.iter().try_for_each(|line| validate_line(line))?;
        Ok(MultiLineString {
            vertices,
            polylines: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Vec<Position>] {
        &self.vertices
    }

    pub(crate) fn polylines(&self) -> &[Polyline] {
        self.polylines.get_or_init(|| {
            self.vertices
                .iter()
                .map(|line| Polyline::from_positions(line))
                .collect()
        })
    }
}

#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vec<Position>>,
    polygon: OnceLock<sphere::Polygon>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec<Position>>) -> Result<Self> {
        validate_rings(&vertices)?;
        Ok(Polygon {
            vertices,
            polygon: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Vec<Position>] {
        &self.vertices
    }

    pub(crate) fn polygon(&self) -> &sphere::Polygon {
        self.polygon
            .get_or_init(|| sphere::Polygon::from_positions(&self.vertices))
    }
}

#[derive(Debug, Clone)]
pub struct MultiPolygon {
    vertices: Vec<Vec<Vec<Position>>>,
    polygons: OnceLock<Vec<sphere::Polygon>>,
}

impl MultiPolygon {
    pub fn new(vertices: Vec<Vec<Vec<Position>>>) -> Result<Self> {
        vertices.iter().try_for_each(|rings| validate_rings(rings))?;
        Ok(MultiPolygon {
            vertices,
            polygons: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Vec<Vec<Position>>] {
        &self.vertices
    }

    pub(crate) fn polygons(&self) -> &[sphere::Polygon] {
        self.polygons.get_or_init(|| {
            self.vertices
                .iter()
                .map(|rings| sphere::Polygon::from_positions(rings))
                .collect()
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeometryCollection {
    shapes: Vec<GeoShape>,
}

impl GeometryCollection {
    pub fn new(shapes: Vec<GeoShape>) -> Self {
        GeometryCollection { shapes }
    }

    pub fn shapes(&self) -> &[GeoShape] {
        &self.shapes
    }

    /// Member shapes with composite members expanded one level.
    pub fn members(&self) -> Vec<GeoShape> {
        let mut members = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            match shape.members() {
                Some(inner) => members.extend(inner),
                None => members.push(shape.clone()),
            }
        }
        members
    }
}

#[derive(Debug, Clone)]
pub struct Circle {
    center: Position,
    radius_in_meters: f64,
    cap: OnceLock<Cap>,
}

impl Circle {
    pub fn new(center: Position, radius_in_meters: f64) -> Result<Self> {
        validate_position(&center)?;
        if !radius_in_meters.is_finite() || radius_in_meters < 0.0 {
            return Err(LancetError::geo(format!(
                "invalid circle radius {radius_in_meters}"
            )));
        }
        Ok(Circle {
            center,
            radius_in_meters,
            cap: OnceLock::new(),
        })
    }

    pub fn center(&self) -> &[f64] {
        &self.center
    }

    pub fn radius_in_meters(&self) -> f64 {
        self.radius_in_meters
    }

    pub(crate) fn cap(&self) -> &Cap {
        self.cap
            .get_or_init(|| Cap::from_position_meters(&self.center, self.radius_in_meters))
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    vertices: Vec<Position>,
    rect: OnceLock<LatLngRect>,
}

impl Envelope {
    /// An envelope from its top-left and bottom-right corners.
    pub fn new(vertices: Vec<Position>) -> Result<Self> {
        if vertices.len() != 2 {
            return Err(LancetError::geo(format!(
                "envelope needs exactly 2 positions, got {}",
                vertices.len()
            )));
        }
        vertices.iter().try_for_each(|p| validate_position(p))?;
        Ok(Envelope {
            vertices,
            rect: OnceLock::new(),
        })
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.vertices
    }

    pub(crate) fn rect(&self) -> &LatLngRect {
        self.rect
            .get_or_init(|| LatLngRect::from_bounds(&self.vertices[0], &self.vertices[1]))
    }
}

/// Query-only rectangle. Its predicates never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedRectangle {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Query-only polygon given as lon/lat pairs. Its predicates never match.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPolygon {
    pub coordinates: Vec<(f64, f64)>,
}

/// Query-only distance region. Its predicates never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDistance {
    pub center_lat: f64,
    pub center_lon: f64,
    pub dist: f64,
}

/// Any shape the predicate engine understands.
#[derive(Debug, Clone)]
pub enum GeoShape {
    Point(Point),
    MultiPoint(MultiPoint),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
    Circle(Circle),
    Envelope(Envelope),
    BoundedRectangle(BoundedRectangle),
    BoundedPolygon(BoundedPolygon),
    PointDistance(PointDistance),
}

impl GeoShape {
    pub fn point(vertices: Position) -> Result<Self> {
        Ok(GeoShape::Point(Point::new(vertices)?))
    }

    pub fn multi_point(vertices: Vec<Position>) -> Result<Self> {
        Ok(GeoShape::MultiPoint(MultiPoint::new(vertices)?))
    }

    pub fn line_string(vertices: Vec<Position>) -> Result<Self> {
        Ok(GeoShape::LineString(LineString::new(vertices)?))
    }

    pub fn multi_line_string(vertices: Vec<Vec<Position>>) -> Result<Self> {
        Ok(GeoShape::MultiLineString(MultiLineString::new(vertices)?))
    }

    pub fn polygon(vertices: Vec<Vec<Position>>) -> Result<Self> {
        Ok(GeoShape::Polygon(Polygon::new(vertices)?))
    }

    pub fn multi_polygon(vertices: Vec<Vec<Vec<Position>>>) -> Result<Self> {
        Ok(GeoShape::MultiPolygon(MultiPolygon::new(vertices)?))
    }

    pub fn geometry_collection(shapes: Vec<GeoShape>) -> Self {
        GeoShape::GeometryCollection(GeometryCollection::new(shapes))
    }

    pub fn circle(center: Position, radius_in_meters: f64) -> Result<Self> {
        Ok(GeoShape::Circle(Circle::new(center, radius_in_meters)?))
    }

    pub fn envelope(vertices: Vec<Position>) -> Result<Self> {
        Ok(GeoShape::Envelope(Envelope::new(vertices)?))
    }

    pub fn bounded_rectangle(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        GeoShape::BoundedRectangle(BoundedRectangle {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    pub fn bounded_polygon(coordinates: Vec<(f64, f64)>) -> Self {
        GeoShape::BoundedPolygon(BoundedPolygon { coordinates })
    }

    pub fn point_distance(center_lat: f64, center_lon: f64, dist: f64) -> Self {
        GeoShape::PointDistance(PointDistance {
            center_lat,
            center_lon,
            dist,
        })
    }

    /// Lower-case type name, as written in GeoJSON.
    pub fn shape_type(&self) -> &'static str {
        match self {
            GeoShape::Point(_) => POINT_TYPE,
            GeoShape::MultiPoint(_) => MULTI_POINT_TYPE,
            GeoShape::LineString(_) => LINE_STRING_TYPE,
            GeoShape::MultiLineString(_) => MULTI_LINE_STRING_TYPE,
            GeoShape::Polygon(_) => POLYGON_TYPE,
            GeoShape::MultiPolygon(_) => MULTI_POLYGON_TYPE,
            GeoShape::GeometryCollection(_) => GEOMETRY_COLLECTION_TYPE,
            GeoShape::Circle(_) => CIRCLE_TYPE,
            GeoShape::Envelope(_) => ENVELOPE_TYPE,
            GeoShape::BoundedRectangle(_) => "boundedRectangle",
            GeoShape::BoundedPolygon(_) => "boundedPolygon",
            GeoShape::PointDistance(_) => "pointDistance",
        }
    }

    /// The shape's coordinates; `None` for collections and query-only shapes.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeoShape::Point(p) => Some(Coordinates::Position(p.vertices.clone())),
            GeoShape::MultiPoint(p) => Some(Coordinates::Line(p.vertices.clone())),
            GeoShape::LineString(p) => Some(Coordinates::Line(p.vertices.clone())),
            GeoShape::MultiLineString(p) => Some(Coordinates::Rings(p.vertices.clone())),
            GeoShape::Polygon(p) => Some(Coordinates::Rings(p.vertices.clone())),
            GeoShape::MultiPolygon(p) => Some(Coordinates::Polygons(p.vertices.clone())),
            GeoShape::Circle(c) => Some(Coordinates::Position(c.center.clone())),
            GeoShape::Envelope(e) => Some(Coordinates::Line(e.vertices.clone())),
            GeoShape::GeometryCollection(_)
            | GeoShape::BoundedRectangle(_)
            | GeoShape::BoundedPolygon(_)
            | GeoShape::PointDistance(_) => None,
        }
    }

    /// Whether the shape is composed of other shapes.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            GeoShape::MultiPoint(_)
                | GeoShape::MultiLineString(_)
                | GeoShape::MultiPolygon(_)
                | GeoShape::GeometryCollection(_)
        )
    }

    /// The member shapes of a composite shape.
    pub fn members(&self) -> Option<Vec<GeoShape>> {
        // members are built from already-validated coordinates
        let members = match self {
            GeoShape::MultiPoint(mp) => mp
                .vertices
                .iter()
                .map(|v| GeoShape::Point(Point { vertices: v.clone(), cell: OnceLock::new() }))
                .collect(),
            GeoShape::MultiLineString(mls) => mls
                .vertices
                .iter()
                .map(|v| {
                    GeoShape::LineString(LineString {
                        vertices: v.clone(),
                        polyline: OnceLock::new(),
                    })
                })
                .collect(),
            GeoShape::MultiPolygon(mp) => mp
                .vertices
                .iter()
                .map(|v| {
                    GeoShape::Polygon(Polygon {
                        vertices: v.clone(),
                        polygon: OnceLock::new(),
                    })
                })
                .collect(),
            GeoShape::GeometryCollection(gc) => gc.members(),
            _ => return None,
        };
        Some(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(GeoShape::point(vec![1.0]).is_err());
        assert!(GeoShape::point(vec![f64::NAN, 1.0]).is_err());
        assert!(GeoShape::line_string(vec![vec![0.0, 0.0]]).is_err());
        assert!(GeoShape::polygon(vec![]).is_err());
        assert!(GeoShape::envelope(vec![vec![0.0, 0.0]]).is_err());
        assert!(GeoShape::circle(vec![0.0, 0.0], -1.0).is_err());
        assert!(GeoShape::point(vec![1.0, 2.0, 30.0]).is_ok());
    }

    #[test]
    fn test_members() {
        let mp = GeoShape::multi_point(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let members = mp.members().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].shape_type(), POINT_TYPE);

        let point = GeoShape::point(vec![5.0, 5.0]).unwrap();
        assert!(point.members().is_none());

        let gc = GeoShape::geometry_collection(vec![mp, point]);
        let members = gc.members().unwrap();
        assert_eq!(members.len(), 3);
        assert!(members.iter().all(|m| m.shape_type() == POINT_TYPE));
    }

    #[test]
    fn test_coordinates() {
        let line = GeoShape::line_string(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        assert_eq!(
            line.coordinates(),
            Some(Coordinates::Line(vec![vec![0.0, 0.0], vec![1.0, 1.0]]))
        );
        let gc = GeoShape::geometry_collection(vec![line]);
        assert!(gc.coordinates().is_none());
    }
}
