//! Spherical geometry primitives backing the shape predicates.
//!
//! Points are unit vectors. Edges are great-circle arcs shorter than a half
//! circle. A loop's interior is the region on its left, so a counter-clockwise
//! ring bounds the area it encloses and a clockwise ring bounds everything
//! else. A "cell" here is a single point with a leaf-sized tolerance: two
//! points closer than [`CELL_EPSILON`] share a cell.

use std::f64::consts::TAU;

use super::distance::EARTH_RADIUS_METERS;

/// Angular size (radians) below which two points are treated as one cell.
pub const CELL_EPSILON: f64 = 1e-9;

/// A point on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpherePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SpherePoint {
    /// Point from latitude and longitude in degrees.
    pub fn from_degrees(lat: f64, lng: f64) -> Self {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_lng, cos_lng) = lng.to_radians().sin_cos();
        SpherePoint {
            x: cos_lat * cos_lng,
            y: cos_lat * sin_lng,
            z: sin_lat,
        }
    }

    /// Point from a GeoJSON `[lon, lat, ...]` position.
    pub fn from_position(position: &[f64]) -> Self {
        let lon = position.first().copied().unwrap_or_default();
        let lat = position.get(1).copied().unwrap_or_default();
        Self::from_degrees(lat, lon)
    }

    pub fn lat_degrees(&self) -> f64 {
        self.z.atan2((self.x * self.x + self.y * self.y).sqrt()).to_degrees()
    }

    pub fn lng_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    fn dot(&self, o: &SpherePoint) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    fn cross(&self, o: &SpherePoint) -> SpherePoint {
        SpherePoint {
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x,
        }
    }

    fn scale(&self, s: f64) -> SpherePoint {
        SpherePoint {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    fn sub(&self, o: &SpherePoint) -> SpherePoint {
        SpherePoint {
            x: self.x - o.x,
            y: self.y - o.y,
            z: self.z - o.z,
        }
    }

    fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    fn normalize(&self) -> SpherePoint {
        let n = self.norm();
        if n == 0.0 { *self } else { self.scale(1.0 / n) }
    }

    /// Angle between two points, in radians.
    pub fn angle(&self, o: &SpherePoint) -> f64 {
        self.cross(o).norm().atan2(self.dot(o))
    }

    /// Whether both points fall in the same cell.
    pub fn same_cell(&self, o: &SpherePoint) -> bool {
        self.angle(o) <= CELL_EPSILON
    }

    /// The x/y components, used by the planar segment test.
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Convert a distance in meters to an angle on the unit sphere.
pub fn meters_to_angle(meters: f64) -> f64 {
    meters / EARTH_RADIUS_METERS
}

/// Distance (radians) from `p` to the arc `a`-`b`.
pub fn distance_from_segment(p: &SpherePoint, a: &SpherePoint, b: &SpherePoint) -> f64 {
    let n = a.cross(b);
    if n.norm() == 0.0 {
        return p.angle(a).min(p.angle(b));
    }
    let n = n.normalize();
    // the foot of the perpendicular lies between a and b
    if n.cross(a).dot(p) > 0.0 && b.cross(&n).dot(p) > 0.0 {
        return n.dot(p).abs().min(1.0).asin();
    }
    p.angle(a).min(p.angle(b))
}

/// Signed area of the spherical triangle `a`-`b`-`c`, positive when the
/// vertices run counter-clockwise.
fn signed_area(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint) -> f64 {
    let det = a.dot(&b.cross(c));
    2.0 * det.atan2(1.0 + a.dot(b) + b.dot(c) + c.dot(a))
}

/// Strict crossing test for arcs `a`-`b` and `c`-`d`: true when the arcs
/// meet at a point interior to both.
fn simple_crossing(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> bool {
    let ab = a.cross(b);
    let acb = -ab.dot(c);
    let bda = ab.dot(d);
    if acb * bda <= 0.0 {
        return false;
    }
    let cd = c.cross(d);
    let cbd = -cd.dot(b);
    let dac = cd.dot(a);
    acb * cbd > 0.0 && acb * dac > 0.0
}

/// Whether arcs `a`-`b` and `c`-`d` cross or touch.
pub fn edges_intersect(a: &SpherePoint, b: &SpherePoint, c: &SpherePoint, d: &SpherePoint) -> bool {
    simple_crossing(a, b, c, d)
        || distance_from_segment(c, a, b) <= CELL_EPSILON
        || distance_from_segment(d, a, b) <= CELL_EPSILON
        || distance_from_segment(a, c, d) <= CELL_EPSILON
        || distance_from_segment(b, c, d) <= CELL_EPSILON
}

fn orientation(p: [f64; 2], q: [f64; 2], r: [f64; 2]) -> i8 {
    let val = (q[1] - p[1]) * (r[0] - q[0]) - (q[0] - p[0]) * (r[1] - q[1]);
    if val == 0.0 {
        0
    } else if val > 0.0 {
        1
    } else {
        2
    }
}

fn on_segment(p: [f64; 2], q: [f64; 2], r: [f64; 2]) -> bool {
    q[0] <= p[0].max(r[0]) && q[0] >= p[0].min(r[0]) && q[1] <= p[1].max(r[1]) && q[1] >= p[1].min(r[1])
}

/// Planar orientation test for segments `p1`-`q1` and `p2`-`q2`, touching
/// and collinear overlap included.
pub fn segments_intersect(p1: [f64; 2], q1: [f64; 2], p2: [f64; 2], q2: [f64; 2]) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

/// A circle on the sphere: centre and angular radius.
#[derive(Debug, Clone, Copy)]
pub struct Cap {
    pub center: SpherePoint,
    pub radius: f64,
}

impl Cap {
    pub fn new(center: SpherePoint, radius: f64) -> Self {
        Cap { center, radius }
    }

    /// Cap around a `[lon, lat]` centre with a radius in meters.
    pub fn from_position_meters(position: &[f64], radius_meters: f64) -> Self {
        Cap::new(
            SpherePoint::from_position(position),
            meters_to_angle(radius_meters),
        )
    }

    pub fn contains_point(&self, p: &SpherePoint) -> bool {
        self.center.angle(p) <= self.radius
    }

    pub fn intersects(&self, other: &Cap) -> bool {
        self.center.angle(&other.center) <= self.radius + other.radius
    }

    pub fn contains(&self, other: &Cap) -> bool {
        self.center.angle(&other.center) + other.radius <= self.radius
    }

    /// Smallest lat/lng rectangle enclosing the cap.
    pub fn rect_bound(&self) -> LatLngRect {
        let lat = self.center.lat_degrees();
        let lng = self.center.lng_degrees();
        let r = self.radius.to_degrees();
        let lat_lo = lat - r;
        let lat_hi = lat + r;
        if lat_lo <= -90.0 || lat_hi >= 90.0 {
            return LatLngRect {
                lat_lo: lat_lo.max(-90.0),
                lat_hi: lat_hi.min(90.0),
                lng: LngInterval::full(),
            };
        }
        let ratio = self.radius.sin() / lat.to_radians().cos();
        if ratio >= 1.0 {
            return LatLngRect {
                lat_lo,
                lat_hi,
                lng: LngInterval::full(),
            };
        }
        let dlng = ratio.asin().to_degrees();
        LatLngRect {
            lat_lo,
            lat_hi,
            lng: LngInterval::new(wrap_lng(lng - dlng), wrap_lng(lng + dlng)),
        }
    }
}

fn wrap_lng(lng: f64) -> f64 {
    if lng < -180.0 {
        lng + 360.0
    } else if lng > 180.0 {
        lng - 360.0
    } else {
        lng
    }
}

/// A longitude interval that may wrap across the date line (`lo > hi`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngInterval {
    pub lo: f64,
    pub hi: f64,
}

impl LngInterval {
    pub fn new(lo: f64, hi: f64) -> Self {
        LngInterval { lo, hi }
    }

    pub fn full() -> Self {
        LngInterval {
            lo: -180.0,
            hi: 180.0,
        }
    }

    /// The shorter interval containing both longitudes.
    pub fn from_pair(a: f64, b: f64) -> Self {
        let positive_distance = |from: f64, to: f64| (to - from).rem_euclid(360.0);
        if positive_distance(b, a) < positive_distance(a, b) {
            LngInterval::new(b, a)
        } else {
            LngInterval::new(a, b)
        }
    }

    pub fn is_full(&self) -> bool {
        self.hi - self.lo >= 360.0 || (self.lo == -180.0 && self.hi == 180.0)
    }

    pub fn is_inverted(&self) -> bool {
        self.lo > self.hi
    }

    fn contains_raw(&self, p: f64) -> bool {
        if self.is_inverted() {
            p >= self.lo || p <= self.hi
        } else {
            p >= self.lo && p <= self.hi
        }
    }

    pub fn contains(&self, p: f64) -> bool {
        self.contains_raw(p)
            || (p == -180.0 && self.contains_raw(180.0))
            || (p == 180.0 && self.contains_raw(-180.0))
    }

    pub fn contains_interval(&self, o: &LngInterval) -> bool {
        if self.is_inverted() {
            if o.is_inverted() {
                return o.lo >= self.lo && o.hi <= self.hi;
            }
            return o.lo >= self.lo || o.hi <= self.hi;
        }
        if o.is_inverted() {
            return self.is_full();
        }
        o.lo >= self.lo && o.hi <= self.hi
    }

    pub fn intersects(&self, o: &LngInterval) -> bool {
        if self.is_inverted() {
            return o.is_inverted() || o.lo <= self.hi || o.hi >= self.lo;
        }
        if o.is_inverted() {
            return o.lo <= self.hi || o.hi >= self.lo;
        }
        o.lo <= self.hi && o.hi >= self.lo
    }
}

/// A latitude/longitude rectangle.
#[derive(Debug, Clone, Copy)]
pub struct LatLngRect {
    pub lat_lo: f64,
    pub lat_hi: f64,
    pub lng: LngInterval,
}

impl LatLngRect {
    /// Smallest rectangle containing two `[lon, lat]` corners.
    pub fn from_bounds(top_left: &[f64], bottom_right: &[f64]) -> Self {
        let lon1 = top_left.first().copied().unwrap_or_default();
        let lat1 = top_left.get(1).copied().unwrap_or_default();
        let lon2 = bottom_right.first().copied().unwrap_or_default();
        let lat2 = bottom_right.get(1).copied().unwrap_or_default();
        LatLngRect {
            lat_lo: lat1.min(lat2),
            lat_hi: lat1.max(lat2),
            lng: LngInterval::from_pair(lon1, lon2),
        }
    }

    pub fn contains_lat_lng(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat_lo && lat <= self.lat_hi && self.lng.contains(lng)
    }

    pub fn contains_position(&self, position: &[f64]) -> bool {
        let lon = position.first().copied().unwrap_or_default();
        let lat = position.get(1).copied().unwrap_or_default();
        self.contains_lat_lng(lat, lon)
    }

    pub fn contains_point(&self, p: &SpherePoint) -> bool {
        self.contains_lat_lng(p.lat_degrees(), p.lng_degrees())
    }

    pub fn intersects(&self, o: &LatLngRect) -> bool {
        self.lat_lo <= o.lat_hi && o.lat_lo <= self.lat_hi && self.lng.intersects(&o.lng)
    }

    pub fn contains(&self, o: &LatLngRect) -> bool {
        o.lat_lo >= self.lat_lo && o.lat_hi <= self.lat_hi && self.lng.contains_interval(&o.lng)
    }

    /// Corner `k` (mod 4) in counter-clockwise order starting at the
    /// lower-left, as `(lat, lng)` degrees.
    pub fn vertex(&self, k: usize) -> (f64, f64) {
        match k % 4 {
            0 => (self.lat_lo, self.lng.lo),
            1 => (self.lat_lo, self.lng.hi),
            2 => (self.lat_hi, self.lng.hi),
            _ => (self.lat_hi, self.lng.lo),
        }
    }

    pub fn vertex_point(&self, k: usize) -> SpherePoint {
        let (lat, lng) = self.vertex(k);
        SpherePoint::from_degrees(lat, lng)
    }

    /// The rectangle's four corners as a closed polyline.
    pub fn boundary(&self) -> Polyline {
        Polyline::new((0..=4).map(|k| self.vertex_point(k)).collect())
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(vec![Loop::new((0..4).map(|k| self.vertex_point(k)).collect())])
    }
}

/// A chain of great-circle edges.
#[derive(Debug, Clone)]
pub struct Polyline {
    vertices: Vec<SpherePoint>,
}

impl Polyline {
    pub fn new(vertices: Vec<SpherePoint>) -> Self {
        Polyline { vertices }
    }

    pub fn from_positions(positions: &[Vec<f64>]) -> Self {
        Polyline::new(
            positions
                .iter()
                .map(|p| SpherePoint::from_position(p))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[SpherePoint] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> {
        self.vertices.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Distance (radians) from `p` to the closest point of the polyline.
    pub fn distance(&self, p: &SpherePoint) -> f64 {
        if self.vertices.len() == 1 {
            return p.angle(&self.vertices[0]);
        }
        self.edges()
            .map(|(a, b)| distance_from_segment(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn intersects_point(&self, p: &SpherePoint) -> bool {
        self.distance(p) <= CELL_EPSILON
    }

    pub fn intersects(&self, other: &Polyline) -> bool {
        self.edges().any(|(a, b)| {
            other
                .edges()
                .any(|(c, d)| edges_intersect(a, b, c, d))
        })
    }
}

/// A closed ring of vertices; the closing edge is implicit.
#[derive(Debug, Clone)]
pub struct Loop {
    vertices: Vec<SpherePoint>,
}

impl Loop {
    /// Build a loop, dropping repeated vertices and the closing one.
    pub fn new(mut vertices: Vec<SpherePoint>) -> Self {
        vertices.dedup();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Loop { vertices }
    }

    pub fn vertices(&self) -> &[SpherePoint] {
        &self.vertices
    }

    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// Sum of the signed turning angles at each vertex, left turns positive.
    fn turning_angle(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let a = &self.vertices[(i + n - 1) % n];
                let b = &self.vertices[i];
                let c = &self.vertices[(i + 1) % n];
                let (n1, n2) = (a.cross(b), b.cross(c));
                n1.cross(&n2).dot(b).atan2(n1.dot(&n2))
            })
            .sum()
    }

    /// Area (steradians) of the region on the loop's left.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        TAU - self.turning_angle()
    }

    /// Whether the left region is the smaller of the two.
    pub fn is_counter_clockwise(&self) -> bool {
        self.area() <= TAU
    }

    // Winding number of the loop around the axis through `p`, seen from `p`.
    fn winding(&self, p: &SpherePoint) -> i64 {
        let mut total = 0.0;
        for (a, b) in self.edges() {
            let ta = a.sub(&p.scale(p.dot(a)));
            let tb = b.sub(&p.scale(p.dot(b)));
            total += p.dot(&ta.cross(&tb)).atan2(ta.dot(&tb));
        }
        (total / TAU).round() as i64
    }

    /// Whether `p` lies on the loop's left.
    ///
    /// A non-zero winding around `p` settles it directly. Otherwise `p` and
    /// its antipode share a side, and the signed area fanned out from `p`
    /// tells which: it equals [`Loop::area`] when the antipode is outside
    /// and falls short of it by a full sphere when it is inside.
    pub fn contains_point(&self, p: &SpherePoint) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        match self.winding(p) {
            w if w > 0 => true,
            w if w < 0 => false,
            _ => {
                let fanned: f64 = self.edges().map(|(a, b)| signed_area(p, a, b)).sum();
                fanned < self.area() - TAU
            }
        }
    }

    /// Containment in the smaller of the two regions, whatever the ring's
    /// orientation.
    pub fn contains_point_normalized(&self, p: &SpherePoint) -> bool {
        self.contains_point(p) == self.is_counter_clockwise()
    }

    pub fn boundary_distance(&self, p: &SpherePoint) -> f64 {
        self.edges()
            .map(|(a, b)| distance_from_segment(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// A polygon: the first loop is the shell, later loops are holes.
#[derive(Debug, Clone)]
pub struct Polygon {
    loops: Vec<Loop>,
}

impl Polygon {
    pub fn new(loops: Vec<Loop>) -> Self {
        Polygon { loops }
    }

    pub fn from_positions(rings: &[Vec<Vec<f64>>]) -> Self {
        Polygon::new(
            rings
                .iter()
                .map(|ring| Loop::new(ring.iter().map(|p| SpherePoint::from_position(p)).collect()))
                .collect(),
        )
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn edges(&self) -> impl Iterator<Item = (&SpherePoint, &SpherePoint)> {
        self.loops.iter().flat_map(|l| l.edges())
    }

    pub fn vertices(&self) -> impl Iterator<Item = &SpherePoint> {
        self.loops.iter().flat_map(|l| l.vertices().iter())
    }

    /// Inside the shell and outside every hole. The shell follows its
    /// orientation; a hole always cuts out the smaller region it bounds.
    pub fn contains_point(&self, p: &SpherePoint) -> bool {
        match self.loops.split_first() {
            Some((shell, holes)) => {
                shell.contains_point(p) && !holes.iter().any(|h| h.contains_point_normalized(p))
            }
            None => false,
        }
    }

    pub fn boundary_distance(&self, p: &SpherePoint) -> f64 {
        self.loops
            .iter()
            .map(|l| l.boundary_distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    fn covers_point(&self, p: &SpherePoint) -> bool {
        self.contains_point(p) || self.boundary_distance(p) <= CELL_EPSILON
    }

    /// Whether the cell at `p` touches the polygon.
    pub fn intersects_cell(&self, p: &SpherePoint) -> bool {
        self.covers_point(p)
    }

    /// Distance from `p` to the polygon; zero inside.
    pub fn distance(&self, p: &SpherePoint) -> f64 {
        if self.contains_point(p) {
            0.0
        } else {
            self.boundary_distance(p)
        }
    }

    pub fn intersects(&self, other: &Polygon) -> bool {
        if self
            .edges()
            .any(|(a, b)| other.edges().any(|(c, d)| edges_intersect(a, b, c, d)))
        {
            return true;
        }
        other.vertices().any(|v| self.covers_point(v)) || self.vertices().any(|v| other.covers_point(v))
    }

    pub fn contains(&self, other: &Polygon) -> bool {
        if self
            .edges()
            .any(|(a, b)| other.edges().any(|(c, d)| simple_crossing(a, b, c, d)))
        {
            return false;
        }
        if !other.vertices().all(|v| self.covers_point(v)) {
            return false;
        }
        // a hole of self sitting strictly inside other punches through it
        !self
            .vertices()
            .any(|v| other.contains_point(v) && other.boundary_distance(v) > CELL_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: f64, hi: f64) -> Vec<Vec<f64>> {
        vec![
            vec![lo, lo],
            vec![hi, lo],
            vec![hi, hi],
            vec![lo, hi],
            vec![lo, lo],
        ]
    }

    #[test]
    fn test_polygon_contains_point() {
        let polygon = Polygon::from_positions(&[square(0.0, 10.0)]);
        assert!(polygon.contains_point(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(!polygon.contains_point(&SpherePoint::from_degrees(15.0, 5.0)));

        // a clockwise ring bounds everything outside it
        let mut ring = square(0.0, 10.0);
        ring.reverse();
        let reversed = Polygon::from_positions(&[ring]);
        assert!(!reversed.contains_point(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(reversed.contains_point(&SpherePoint::from_degrees(15.0, 5.0)));
        assert!(reversed.contains_point(&SpherePoint::from_degrees(-5.0, -175.0)));
    }

    #[test]
    fn test_loop_orientation() {
        let ccw = Loop::new(square(0.0, 10.0).iter().map(|p| SpherePoint::from_position(p)).collect());
        assert!(ccw.is_counter_clockwise());
        // roughly 10 x 10 degrees
        let degree = 1f64.to_radians();
        assert!((ccw.area() / (degree * degree) - 100.0).abs() < 2.0);

        let mut ring = square(0.0, 10.0);
        ring.reverse();
        let cw = Loop::new(ring.iter().map(|p| SpherePoint::from_position(p)).collect());
        assert!(!cw.is_counter_clockwise());
        assert!((ccw.area() + cw.area() - 2.0 * TAU).abs() < 1e-9);

        let inside = SpherePoint::from_degrees(5.0, 5.0);
        assert!(ccw.contains_point_normalized(&inside));
        assert!(cw.contains_point_normalized(&inside));
    }

    #[test]
    fn test_polygon_larger_than_hemisphere() {
        // edges take the short way across the date line, so the ring runs
        // clockwise around the small box there
        let world = Polygon::from_positions(&[vec![
            vec![-135.0, -38.0],
            vec![149.0, -38.0],
            vec![149.0, 77.0],
            vec![-135.0, 77.0],
        ]]);
        let bangalore = SpherePoint::from_degrees(12.95, 77.59);
        let antipode = SpherePoint::from_degrees(-12.95, -102.41);
        assert!(world.contains_point(&bangalore));
        assert!(world.contains_point(&antipode));
        assert!(world.contains_point(&SpherePoint::from_degrees(38.0, 13.2)));
        assert!(!world.contains_point(&SpherePoint::from_degrees(0.0, 180.0)));
    }

    #[test]
    fn test_polygon_hole() {
        let polygon = Polygon::from_positions(&[square(0.0, 10.0), square(4.0, 6.0)]);
        assert!(!polygon.contains_point(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(polygon.contains_point(&SpherePoint::from_degrees(2.0, 2.0)));

        // a clockwise hole cuts out the same area
        let mut hole = square(4.0, 6.0);
        hole.reverse();
        let polygon = Polygon::from_positions(&[square(0.0, 10.0), hole]);
        assert!(!polygon.contains_point(&SpherePoint::from_degrees(5.0, 5.0)));
        assert!(polygon.contains_point(&SpherePoint::from_degrees(2.0, 2.0)));
        assert!(!polygon.contains_point(&SpherePoint::from_degrees(20.0, 20.0)));
    }

    #[test]
    fn test_polygon_relations() {
        let outer = Polygon::from_positions(&[square(0.0, 10.0)]);
        let inner = Polygon::from_positions(&[square(2.0, 4.0)]);
        let overlapping = Polygon::from_positions(&[square(8.0, 12.0)]);
        let apart = Polygon::from_positions(&[square(20.0, 30.0)]);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.intersects(&overlapping));
        assert!(!outer.contains(&overlapping));
        assert!(!outer.intersects(&apart));
        assert!(outer.contains(&outer));
    }

    #[test]
    fn test_distance_from_segment() {
        let a = SpherePoint::from_degrees(0.0, 0.0);
        let b = SpherePoint::from_degrees(0.0, 10.0);
        let p = SpherePoint::from_degrees(1.0, 5.0);
        assert!((distance_from_segment(&p, &a, &b) - 1f64.to_radians()).abs() < 1e-9);

        let beyond = SpherePoint::from_degrees(0.0, 12.0);
        assert!((distance_from_segment(&beyond, &a, &b) - 2f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_edges_intersect() {
        let p = |lat, lng| SpherePoint::from_degrees(lat, lng);
        assert!(edges_intersect(&p(0.0, -1.0), &p(0.0, 1.0), &p(-1.0, 0.0), &p(1.0, 0.0)));
        assert!(!edges_intersect(&p(0.0, -1.0), &p(0.0, 1.0), &p(2.0, 0.0), &p(3.0, 0.0)));
        // touching at an endpoint
        assert!(edges_intersect(&p(0.0, 0.0), &p(0.0, 1.0), &p(0.0, 1.0), &p(1.0, 1.0)));
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect([0.0, 0.0], [2.0, 2.0], [0.0, 2.0], [2.0, 0.0]));
        assert!(!segments_intersect([0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 0.0]));
        assert!(segments_intersect([0.0, 0.0], [2.0, 0.0], [1.0, 0.0], [3.0, 0.0]));
    }

    #[test]
    fn test_lng_interval_wraps() {
        let wrapped = LngInterval::from_pair(170.0, -170.0);
        assert!(wrapped.is_inverted());
        assert!(wrapped.contains(180.0));
        assert!(wrapped.contains(-175.0));
        assert!(!wrapped.contains(0.0));

        let plain = LngInterval::from_pair(-10.0, 20.0);
        assert!(!plain.is_inverted());
        assert!(plain.contains(0.0));
        assert!(!wrapped.intersects(&plain));
    }

    #[test]
    fn test_cap() {
        let center = SpherePoint::from_degrees(0.0, 0.0);
        let cap = Cap::new(center, 1f64.to_radians());
        assert!(cap.contains_point(&SpherePoint::from_degrees(0.5, 0.5)));
        assert!(!cap.contains_point(&SpherePoint::from_degrees(2.0, 0.0)));

        let small = Cap::new(SpherePoint::from_degrees(0.2, 0.0), 0.1f64.to_radians());
        assert!(cap.contains(&small));
        assert!(cap.intersects(&small));

        let bound = cap.rect_bound();
        assert!(bound.contains_lat_lng(0.9, 0.0));
        assert!(bound.contains_lat_lng(0.0, 0.9));
        assert!(!bound.contains_lat_lng(1.5, 0.0));
    }
}
