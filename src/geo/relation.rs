//! Intersects/contains predicates across every pair of shape types.
//!
//! `intersects` is existential over composite shapes: any member matching is
//! enough. `contains` is universal when the other shape is composite: every
//! member of it must be held by some part of this shape. A pair with no
//! predicate yields [`LancetError::UnknownGeoJsonType`].
//!
//! Line-versus-polygon and line-versus-envelope edge tests use a planar
//! orientation test on the edge endpoints rather than spherical arcs.

use log::trace;

use super::geojson::{GLUE_BYTES, parse_geojson_shape};
use super::shape::GeoShape;
use super::sphere::{self, Cap, LatLngRect, Polyline, SpherePoint, segments_intersect};
use crate::error::{LancetError, Result};

fn unknown(other: &GeoShape) -> LancetError {
    LancetError::UnknownGeoJsonType(other.shape_type().to_string())
}

impl GeoShape {
    /// Whether this shape and `other` share at least one point.
    pub fn intersects(&self, other: &GeoShape) -> Result<bool> {
        match self {
            GeoShape::Point(p) => cell_intersects_shape(p.cell(), self, other),
            GeoShape::MultiPoint(mp) => Ok(mp
                .cells()
                .iter()
                .any(|cell| matches!(cell_intersects_shape(cell, self, other), Ok(true)))),
            GeoShape::LineString(ls) => {
                polylines_intersect_shape(std::slice::from_ref(ls.polyline()), self, other)
            }
            GeoShape::MultiLineString(mls) => {
                polylines_intersect_shape(mls.polylines(), self, other)
            }
            GeoShape::Polygon(p) => polygon_intersects_shape(p.polygon(), self, other),
            GeoShape::MultiPolygon(mp) => Ok(mp
                .polygons()
                .iter()
                .any(|pgn| matches!(polygon_intersects_shape(pgn, self, other), Ok(true)))),
            GeoShape::GeometryCollection(gc) => Ok(gc
                .members()
                .iter()
                .any(|member| matches!(member.intersects(other), Ok(true)))),
            GeoShape::Circle(c) => cap_intersects_shape(c.cap(), self, other),
            GeoShape::Envelope(e) => rect_intersects_shape(e.rect(), self, other),
            GeoShape::BoundedRectangle(_)
            | GeoShape::BoundedPolygon(_)
            | GeoShape::PointDistance(_) => Ok(false),
        }
    }

    /// Whether `other` lies entirely inside this shape.
    pub fn contains(&self, other: &GeoShape) -> Result<bool> {
        match self {
            GeoShape::Point(p) => Ok(cells_contain_shape(std::slice::from_ref(p.cell()), other)),
            GeoShape::MultiPoint(mp) => Ok(cells_contain_shape(mp.cells(), other)),
            GeoShape::LineString(ls) => Ok(lines_contain_shape(
                std::slice::from_ref(ls.polyline()),
                other,
            )),
            GeoShape::MultiLineString(mls) => Ok(lines_contain_shape(mls.polylines(), other)),
            GeoShape::Polygon(p) => {
                polygons_contain_shape(std::slice::from_ref(p.polygon()), self, other)
            }
            GeoShape::MultiPolygon(mp) => polygons_contain_shape(mp.polygons(), self, other),
            GeoShape::GeometryCollection(gc) => {
                let own = gc.members();
                let held = |shape: &GeoShape| {
                    own.iter()
                        .any(|member| matches!(member.contains(shape), Ok(true)))
                };
                match other.members() {
                    Some(others) => Ok(others.iter().all(held)),
                    None => Ok(held(other)),
                }
            }
            GeoShape::Circle(c) => cap_contains_shape(c.cap(), self, other),
            GeoShape::Envelope(e) => rect_contains_shape(e.rect(), self, other),
            GeoShape::BoundedRectangle(_)
            | GeoShape::BoundedPolygon(_)
            | GeoShape::PointDistance(_) => Ok(false),
        }
    }
}

/// Check a stored shape against a query shape.
///
/// `doc_shape` is the doc value written for a shape field: the glue prefix
/// followed by the shape's GeoJSON. `relation` is one of `intersects`,
/// `contains` (the document shape contains the query shape) or `within`
/// (the query shape contains the document shape).
pub fn filter_geo_shapes_on_relation(
    shape: &GeoShape,
    doc_shape: &[u8],
    relation: &str,
) -> Result<bool> {
    let bytes = doc_shape.strip_prefix(GLUE_BYTES).unwrap_or(doc_shape);
    let shape_in_doc = parse_geojson_shape(bytes)?;

    let matched = match relation {
        "intersects" => shape.intersects(&shape_in_doc)?,
        "contains" => shape_in_doc.contains(shape)?,
        "within" => shape.contains(&shape_in_doc)?,
        _ => return Err(LancetError::UnknownRelation(relation.to_string())),
    };
    trace!(
        "{} {} {}: {}",
        shape.shape_type(),
        relation,
        shape_in_doc.shape_type(),
        matched
    );
    Ok(matched)
}

// Whether `shape_in` intersects any member of a collection.
fn collection_intersects_shape(collection: &GeoShape, shape_in: &GeoShape) -> bool {
    collection
        .members()
        .unwrap_or_default()
        .iter()
        .any(|member| matches!(shape_in.intersects(member), Ok(true)))
}

// Whether `shape_in` contains every member of a collection. Members whose
// check errors are skipped.
fn shape_contains_members(collection: &GeoShape, shape_in: &GeoShape) -> bool {
    !collection
        .members()
        .unwrap_or_default()
        .iter()
        .any(|member| matches!(shape_in.contains(member), Ok(false)))
}

// Every vertex of a point, line or polygon shape, as `[lon, lat, ..]`.
fn vertex_positions(other: &GeoShape) -> Vec<&[f64]> {
    match other {
        GeoShape::Point(p) => vec![p.coordinates()],
        GeoShape::MultiPoint(mp) => mp.coordinates().iter().map(|p| p.as_slice()).collect(),
        GeoShape::LineString(ls) => ls.coordinates().iter().map(|p| p.as_slice()).collect(),
        GeoShape::MultiLineString(mls) => mls
            .coordinates()
            .iter()
            .flatten()
            .map(|p| p.as_slice())
            .collect(),
        GeoShape::Polygon(pgn) => pgn
            .coordinates()
            .iter()
            .flatten()
            .map(|p| p.as_slice())
            .collect(),
        GeoShape::MultiPolygon(mp) => mp
            .coordinates()
            .iter()
            .flatten()
            .flatten()
            .map(|p| p.as_slice())
            .collect(),
        _ => Vec::new(),
    }
}

fn position_points(positions: &[&[f64]]) -> Vec<SpherePoint> {
    positions
        .iter()
        .map(|p| SpherePoint::from_position(p))
        .collect()
}

// Polylines of a line shape; empty for anything else.
fn line_polylines(other: &GeoShape) -> &[Polyline] {
    match other {
        GeoShape::LineString(ls) => std::slice::from_ref(ls.polyline()),
        GeoShape::MultiLineString(mls) => mls.polylines(),
        _ => &[],
    }
}

// Polygons of a polygon shape; empty for anything else.
fn shape_polygons(other: &GeoShape) -> &[sphere::Polygon] {
    match other {
        GeoShape::Polygon(p) => std::slice::from_ref(p.polygon()),
        GeoShape::MultiPolygon(mp) => mp.polygons(),
        _ => &[],
    }
}

fn planar_edges_cross<'a>(
    edges_a: impl Iterator<Item = (&'a SpherePoint, &'a SpherePoint)>,
    polygon: &sphere::Polygon,
) -> bool {
    for (a, b) in edges_a {
        for (c, d) in polygon.edges() {
            if segments_intersect(a.xy(), b.xy(), c.xy(), d.xy()) {
                return true;
            }
        }
    }
    false
}

// A polyline meets a polygon when an edge crosses its boundary or a vertex
// lies inside.
fn polyline_intersects_polygon(pl: &Polyline, polygon: &sphere::Polygon) -> bool {
    planar_edges_cross(pl.edges(), polygon)
        || pl.vertices().iter().any(|v| polygon.intersects_cell(v))
}

// A polyline meets a rectangle when an edge crosses its boundary (planar
// test in degrees) or a vertex lies inside.
fn polyline_intersects_rect(pl: &Polyline, rect: &LatLngRect) -> bool {
    if pl.vertices().iter().any(|v| rect.contains_point(v)) {
        return true;
    }
    let degrees = |p: &SpherePoint| [p.lng_degrees(), p.lat_degrees()];
    pl.edges().any(|(a, b)| {
        (0..4).any(|j| {
            let (lat1, lng1) = rect.vertex(j);
            let (lat2, lng2) = rect.vertex(j + 1);
            segments_intersect(degrees(a), degrees(b), [lng1, lat1], [lng2, lat2])
        })
    })
}

// A polyline is inside a polygon when every vertex is and no edge crosses
// the boundary.
fn polygon_contains_polyline(polygon: &sphere::Polygon, pl: &Polyline) -> bool {
    pl.vertices().iter().all(|v| polygon.contains_point(v)) && !planar_edges_cross(pl.edges(), polygon)
}

fn cell_intersects_shape(cell: &SpherePoint, shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(cell.same_cell(p.cell())),
        GeoShape::MultiPoint(mp) => Ok(mp.cells().iter().any(|p| cell.same_cell(p))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => Ok(shape_polygons(other)
            .iter()
            .any(|pgn| pgn.intersects_cell(cell))),
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .any(|pl| pl.intersects_point(cell))),
        GeoShape::GeometryCollection(_) => Ok(collection_intersects_shape(other, shape_in)),
        GeoShape::Circle(c) => Ok(c.cap().contains_point(cell)),
        GeoShape::Envelope(e) => Ok(e.rect().contains_point(cell)),
        _ => Err(unknown(other)),
    }
}

fn cells_contain_shape(cells: &[SpherePoint], other: &GeoShape) -> bool {
    match other {
        GeoShape::Point(p) => cells.iter().any(|cell| cell.same_cell(p.cell())),
        GeoShape::MultiPoint(mp) => mp
            .cells()
            .iter()
            .all(|p| cells.iter().any(|cell| cell.same_cell(p))),
        // a point has no area to hold anything bigger
        _ => false,
    }
}

fn polylines_intersect_shape(pls: &[Polyline], shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(pls.iter().any(|pl| pl.intersects_point(p.cell()))),
        GeoShape::MultiPoint(mp) => Ok(mp
            .cells()
            .iter()
            .any(|p| pls.iter().any(|pl| pl.intersects_point(p)))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => {
            let polygons = shape_polygons(other);
            Ok(pls
                .iter()
                .any(|pl| polygons.iter().any(|pgn| polyline_intersects_polygon(pl, pgn))))
        }
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => {
            let others = line_polylines(other);
            Ok(pls
                .iter()
                .any(|pl| others.iter().any(|pl2| pl.intersects(pl2))))
        }
        GeoShape::GeometryCollection(_) => Ok(collection_intersects_shape(other, shape_in)),
        GeoShape::Circle(c) => {
            let cap = c.cap();
            Ok(pls.iter().any(|pl| pl.distance(&cap.center) <= cap.radius))
        }
        GeoShape::Envelope(e) => Ok(pls.iter().any(|pl| polyline_intersects_rect(pl, e.rect()))),
        _ => Err(unknown(other)),
    }
}

// Lines only hold points sitting exactly on one of their vertices.
fn lines_contain_shape(pls: &[Polyline], other: &GeoShape) -> bool {
    let on_vertex = |p: &SpherePoint| {
        pls.iter()
            .any(|pl| pl.vertices().iter().any(|v| v.same_cell(p)))
    };
    match other {
        GeoShape::Point(p) => on_vertex(p.cell()),
        GeoShape::MultiPoint(mp) => mp.cells().iter().all(on_vertex),
        _ => false,
    }
}

fn polygon_intersects_shape(
    polygon: &sphere::Polygon,
    shape_in: &GeoShape,
    other: &GeoShape,
) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(polygon.intersects_cell(p.cell())),
        GeoShape::MultiPoint(mp) => Ok(mp.cells().iter().any(|p| polygon.intersects_cell(p))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => Ok(shape_polygons(other)
            .iter()
            .any(|pgn| polygon.intersects(pgn))),
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .any(|pl| polyline_intersects_polygon(pl, polygon))),
        GeoShape::GeometryCollection(_) => Ok(collection_intersects_shape(other, shape_in)),
        GeoShape::Circle(c) => Ok(cap_reaches_polygon(c.cap(), polygon)),
        GeoShape::Envelope(e) => Ok(polygon.intersects(&e.rect().to_polygon())),
        _ => Err(unknown(other)),
    }
}

fn polygons_contain_shape(
    polygons: &[sphere::Polygon],
    shape_in: &GeoShape,
    other: &GeoShape,
) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(polygons.iter().any(|pgn| pgn.contains_point(p.cell()))),
        GeoShape::MultiPoint(mp) => Ok(mp
            .cells()
            .iter()
            .all(|p| polygons.iter().any(|pgn| pgn.contains_point(p)))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => Ok(shape_polygons(other)
            .iter()
            .all(|inner| polygons.iter().any(|pgn| pgn.contains(inner)))),
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .all(|pl| polygons.iter().any(|pgn| polygon_contains_polyline(pgn, pl)))),
        GeoShape::GeometryCollection(_) => {
            let members = other.members().unwrap_or_default();
            Ok(members.iter().all(|member| {
                polygons.iter().any(|pgn| {
                    matches!(
                        polygons_contain_shape(std::slice::from_ref(pgn), shape_in, member),
                        Ok(true)
                    )
                })
            }))
        }
        GeoShape::Circle(c) => Ok(polygons.iter().any(|pgn| polygon_holds_cap(pgn, c.cap()))),
        GeoShape::Envelope(e) => {
            let rect = e.rect().to_polygon();
            Ok(polygons.iter().any(|pgn| pgn.contains(&rect)))
        }
        _ => Err(unknown(other)),
    }
}

fn cap_intersects_shape(cap: &Cap, shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(cap.contains_point(p.cell())),
        GeoShape::MultiPoint(mp) => Ok(mp.cells().iter().any(|p| cap.contains_point(p))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => Ok(shape_polygons(other)
            .iter()
            .any(|pgn| cap_reaches_polygon(cap, pgn))),
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .any(|pl| pl.distance(&cap.center) <= cap.radius)),
        GeoShape::GeometryCollection(_) => Ok(collection_intersects_shape(other, shape_in)),
        GeoShape::Circle(c) => Ok(cap.intersects(c.cap())),
        GeoShape::Envelope(e) => {
            let rect = e.rect();
            Ok(rect.contains_point(&cap.center) || rect.boundary().distance(&cap.center) <= cap.radius)
        }
        _ => Err(unknown(other)),
    }
}

// Inclusive: a cap whose rim touches the boundary still fits.
fn polygon_holds_cap(polygon: &sphere::Polygon, cap: &Cap) -> bool {
    polygon.contains_point(&cap.center) && polygon.boundary_distance(&cap.center) >= cap.radius
}

// Inclusive: a rim touching the polygon counts as meeting it.
fn cap_reaches_polygon(cap: &Cap, polygon: &sphere::Polygon) -> bool {
    polygon.distance(&cap.center) <= cap.radius
}

fn cap_contains_shape(cap: &Cap, shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(_)
        | GeoShape::MultiPoint(_)
        | GeoShape::Polygon(_)
        | GeoShape::MultiPolygon(_) => Ok(position_points(&vertex_positions(other))
            .iter()
            .all(|p| cap.contains_point(p))),
        // only the first two vertices of each line are checked
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .all(|pl| pl.vertices().iter().take(2).all(|v| cap.contains_point(v)))),
        GeoShape::GeometryCollection(_) => Ok(shape_contains_members(other, shape_in)),
        GeoShape::Circle(c) => Ok(cap.contains(c.cap())),
        GeoShape::Envelope(e) => {
            let rect = e.rect();
            Ok((0..4).all(|k| cap.contains_point(&rect.vertex_point(k))))
        }
        _ => Err(unknown(other)),
    }
}

fn rect_intersects_shape(rect: &LatLngRect, shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(p) => Ok(rect.contains_point(p.cell())),
        GeoShape::MultiPoint(mp) => Ok(mp.cells().iter().any(|p| rect.contains_point(p))),
        GeoShape::Polygon(_) | GeoShape::MultiPolygon(_) => {
            let rect_polygon = rect.to_polygon();
            Ok(shape_polygons(other)
                .iter()
                .any(|pgn| pgn.intersects(&rect_polygon)))
        }
        GeoShape::LineString(_) | GeoShape::MultiLineString(_) => Ok(line_polylines(other)
            .iter()
            .any(|pl| polyline_intersects_rect(pl, rect))),
        GeoShape::GeometryCollection(_) => Ok(collection_intersects_shape(other, shape_in)),
        GeoShape::Circle(c) => {
            let cap = c.cap();
            Ok(rect.to_polygon().distance(&cap.center) <= cap.radius)
        }
        GeoShape::Envelope(e) => Ok(rect.intersects(e.rect())),
        _ => Err(unknown(other)),
    }
}

fn rect_contains_shape(rect: &LatLngRect, shape_in: &GeoShape, other: &GeoShape) -> Result<bool> {
    match other {
        GeoShape::Point(_)
        | GeoShape::MultiPoint(_)
        | GeoShape::LineString(_)
        | GeoShape::MultiLineString(_)
        | GeoShape::Polygon(_)
        | GeoShape::MultiPolygon(_) => Ok(vertex_positions(other)
            .iter()
            .all(|p| rect.contains_position(p))),
        GeoShape::GeometryCollection(_) => Ok(shape_contains_members(other, shape_in)),
        GeoShape::Circle(c) => Ok(rect.contains(&c.cap().rect_bound())),
        GeoShape::Envelope(e) => Ok(rect.contains(e.rect())),
        _ => Err(unknown(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::new_geo_json_shape;

    fn square(lo: f64, hi: f64) -> Vec<Vec<f64>> {
        vec![
            vec![lo, lo],
            vec![hi, lo],
            vec![hi, hi],
            vec![lo, hi],
            vec![lo, lo],
        ]
    }

    fn point(lon: f64, lat: f64) -> GeoShape {
        GeoShape::point(vec![lon, lat]).unwrap()
    }

    #[test]
    fn test_point_relations() {
        let a = point(1.0, 1.0);
        assert!(a.intersects(&point(1.0, 1.0)).unwrap());
        assert!(!a.intersects(&point(1.0, 1.1)).unwrap());
        assert!(a.contains(&point(1.0, 1.0)).unwrap());

        let polygon = GeoShape::polygon(vec![square(0.0, 10.0)]).unwrap();
        assert!(a.intersects(&polygon).unwrap());
        assert!(!a.contains(&polygon).unwrap());
    }

    #[test]
    fn test_polygon_relations() {
        let outer = GeoShape::polygon(vec![square(0.0, 10.0)]).unwrap();
        let inner = GeoShape::polygon(vec![square(2.0, 3.0)]).unwrap();
        assert!(outer.contains(&inner).unwrap());
        assert!(!inner.contains(&outer).unwrap());
        assert!(inner.intersects(&outer).unwrap());

        let line_inside = GeoShape::line_string(vec![vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
        let line_across = GeoShape::line_string(vec![vec![5.0, 5.0], vec![15.0, 5.0]]).unwrap();
        assert!(outer.contains(&line_inside).unwrap());
        assert!(!outer.contains(&line_across).unwrap());
        assert!(outer.intersects(&line_across).unwrap());
    }

    #[test]
    fn test_multi_point_containment_is_universal() {
        let outer = GeoShape::polygon(vec![square(0.0, 10.0)]).unwrap();
        let both_in = GeoShape::multi_point(vec![vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
        let one_out = GeoShape::multi_point(vec![vec![1.0, 1.0], vec![20.0, 2.0]]).unwrap();
        assert!(outer.contains(&both_in).unwrap());
        assert!(!outer.contains(&one_out).unwrap());
        assert!(outer.intersects(&one_out).unwrap());
    }

    #[test]
    fn test_circle_relations() {
        let circle = GeoShape::circle(vec![0.0, 0.0], 200_000.0).unwrap();
        assert!(circle.contains(&point(1.0, 0.0)).unwrap());
        assert!(!circle.contains(&point(3.0, 0.0)).unwrap());

        let small = GeoShape::circle(vec![0.5, 0.0], 10_000.0).unwrap();
        assert!(circle.contains(&small).unwrap());
        assert!(circle.intersects(&small).unwrap());

        let envelope = GeoShape::envelope(vec![vec![1.5, 1.0], vec![3.0, -1.0]]).unwrap();
        assert!(circle.intersects(&envelope).unwrap());
        assert!(!circle.contains(&envelope).unwrap());
    }

    #[test]
    fn test_circle_contains_line_checks_leading_vertices() {
        let circle = GeoShape::circle(vec![0.0, 0.0], 200_000.0).unwrap();
        let line =
            GeoShape::line_string(vec![vec![0.1, 0.0], vec![0.2, 0.0], vec![10.0, 0.0]]).unwrap();
        assert!(circle.contains(&line).unwrap());

        let leaving =
            GeoShape::line_string(vec![vec![0.1, 0.0], vec![10.0, 0.0], vec![0.2, 0.0]]).unwrap();
        assert!(!circle.contains(&leaving).unwrap());

        let multi = GeoShape::multi_line_string(vec![
            vec![vec![0.1, 0.0], vec![0.2, 0.0]],
            vec![vec![0.5, 0.5], vec![5.0, 5.0]],
        ])
        .unwrap();
        assert!(!circle.contains(&multi).unwrap());
    }

    #[test]
    fn test_circle_on_polygon_boundary() {
        let polygon = sphere::Polygon::from_positions(&[square(0.0, 10.0)]);

        // centre inside, rim touching the nearest edge
        let center = SpherePoint::from_degrees(3.0, 5.0);
        let rim = polygon.boundary_distance(&center);
        assert!(polygon_holds_cap(&polygon, &Cap::new(center, rim)));
        assert!(!polygon_holds_cap(&polygon, &Cap::new(center, rim * (1.0 + 1e-9))));

        // centre outside, rim reaching the nearest edge
        let center = SpherePoint::from_degrees(-3.0, 5.0);
        let gap = polygon.distance(&center);
        assert!(gap > 0.0);
        assert!(cap_reaches_polygon(&Cap::new(center, gap), &polygon));
        assert!(!cap_reaches_polygon(&Cap::new(center, gap * (1.0 - 1e-9)), &polygon));
    }

    #[test]
    fn test_envelope_relations() {
        let envelope = GeoShape::envelope(vec![vec![0.0, 10.0], vec![10.0, 0.0]]).unwrap();
        assert!(envelope.contains(&point(5.0, 5.0)).unwrap());
        assert!(!envelope.contains(&point(15.0, 5.0)).unwrap());
        assert!(
            envelope
                .contains(&GeoShape::polygon(vec![square(2.0, 3.0)]).unwrap())
                .unwrap()
        );
        let line = GeoShape::line_string(vec![vec![-5.0, 5.0], vec![5.0, 5.0]]).unwrap();
        assert!(envelope.intersects(&line).unwrap());
        assert!(!envelope.contains(&line).unwrap());
    }

    #[test]
    fn test_geometry_collection() {
        let gc = GeoShape::geometry_collection(vec![
            point(1.0, 1.0),
            GeoShape::polygon(vec![square(20.0, 30.0)]).unwrap(),
        ]);
        assert!(gc.intersects(&point(25.0, 25.0)).unwrap());
        assert!(!gc.intersects(&point(15.0, 15.0)).unwrap());

        let targets = GeoShape::multi_point(vec![vec![1.0, 1.0], vec![22.0, 22.0]]).unwrap();
        assert!(gc.contains(&targets).unwrap());
        let partial = GeoShape::multi_point(vec![vec![1.0, 1.0], vec![12.0, 12.0]]).unwrap();
        assert!(!gc.contains(&partial).unwrap());

        let polygon = GeoShape::polygon(vec![square(0.0, 10.0)]).unwrap();
        assert!(polygon.intersects(&gc).unwrap());
    }

    #[test]
    fn test_query_only_shapes_never_match() {
        let rect = GeoShape::bounded_rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(!rect.intersects(&point(5.0, 5.0)).unwrap());
        assert!(!rect.contains(&point(5.0, 5.0)).unwrap());

        let err = point(5.0, 5.0).intersects(&rect).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown geojson type: boundedRectangle found in document"
        );
    }

    #[test]
    fn test_filter_on_relation() {
        let (_, doc_value) = new_geo_json_shape(&[vec![square(0.0, 10.0)]], "Polygon").unwrap();
        let query = point(5.0, 5.0);

        assert!(filter_geo_shapes_on_relation(&query, &doc_value, "intersects").unwrap());
        assert!(filter_geo_shapes_on_relation(&query, &doc_value, "contains").unwrap());
        assert!(!filter_geo_shapes_on_relation(&query, &doc_value, "within").unwrap());

        let err = filter_geo_shapes_on_relation(&query, &doc_value, "touches").unwrap_err();
        assert_eq!(err.to_string(), "unknown relation: touches");
    }
}
