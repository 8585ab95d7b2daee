//! Morton (Z-order) hashing of lon/lat points and planar box predicates.

use crate::numeric::{deinterleave, interleave};

/// Bits per coordinate in a morton hash.
pub const GEO_BITS: u32 = 32;

/// Tolerance used when comparing unhashed coordinates.
pub const GEO_TOLERANCE: f64 = 1e-6;

const MIN_LON: f64 = -180.0;
const MIN_LAT: f64 = -90.0;
const LON_SCALE: f64 = ((1u64 << GEO_BITS) - 1) as f64 / 360.0;
const LAT_SCALE: f64 = ((1u64 << GEO_BITS) - 1) as f64 / 180.0;

fn scale_lon(lon: f64) -> u64 {
    ((lon - MIN_LON) * LON_SCALE) as u64
}

fn scale_lat(lat: f64) -> u64 {
    ((lat - MIN_LAT) * LAT_SCALE) as u64
}

fn unscale_lon(lon: u64) -> f64 {
    lon as f64 / LON_SCALE + MIN_LON
}

fn unscale_lat(lat: u64) -> f64 {
    lat as f64 / LAT_SCALE + MIN_LAT
}

/// Hash a point (ordered lon, lat) into a single sortable integer.
pub fn morton_hash(lon: f64, lat: f64) -> u64 {
    interleave(scale_lon(lon), scale_lat(lat))
}

/// Longitude component of a morton hash.
pub fn morton_unhash_lon(hash: u64) -> f64 {
    unscale_lon(deinterleave(hash))
}

/// Latitude component of a morton hash.
pub fn morton_unhash_lat(hash: u64) -> f64 {
    unscale_lat(deinterleave(hash >> 1))
}

/// Difference between two coordinates, snapped to zero within tolerance.
pub fn compare_geo(a: f64, b: f64) -> f64 {
    let compare = a - b;
    if compare.abs() <= GEO_TOLERANCE {
        0.0
    } else {
        compare
    }
}

/// Whether boxes `a` and `b` overlap.
#[allow(clippy::too_many_arguments)]
pub fn rect_intersects(
    a_min_x: f64,
    a_min_y: f64,
    a_max_x: f64,
    a_max_y: f64,
    b_min_x: f64,
    b_min_y: f64,
    b_max_x: f64,
    b_max_y: f64,
) -> bool {
    !(a_max_x < b_min_x || a_min_x > b_max_x || a_max_y < b_min_y || a_min_y > b_max_y)
}

/// Whether box `a` lies inside box `b`.
#[allow(clippy::too_many_arguments)]
pub fn rect_within(
    a_min_x: f64,
    a_min_y: f64,
    a_max_x: f64,
    a_max_y: f64,
    b_min_x: f64,
    b_min_y: f64,
    b_max_x: f64,
    b_max_y: f64,
) -> bool {
    !(a_min_x < b_min_x || a_min_y < b_min_y || a_max_x > b_max_x || a_max_y > b_max_y)
}

/// Whether the point lies in the box, with [`GEO_TOLERANCE`] slack.
pub fn bounding_box_contains(
    lon: f64,
    lat: f64,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
) -> bool {
    compare_geo(lon, min_lon) >= 0.0
        && compare_geo(lon, max_lon) <= 0.0
        && compare_geo(lat, min_lat) >= 0.0
        && compare_geo(lat, max_lat) <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morton_round_trip() {
        let points = [
            (-180.0, -90.0),
            (-5.0, 27.3),
            (0.0, 0.0),
            (1.0, 1.0),
            (24.7, -80.4),
            (180.0, 90.0),
        ];
        for (lon, lat) in points {
            let hash = morton_hash(lon, lat);
            assert_eq!(compare_geo(lon, morton_unhash_lon(hash)), 0.0, "lon {lon}");
            assert_eq!(compare_geo(lat, morton_unhash_lat(hash)), 0.0, "lat {lat}");
        }
    }

    #[test]
    fn test_scale_round_trip() {
        for lon in [-180.0, 0.0, 1.0, 180.0] {
            assert_eq!(compare_geo(lon, unscale_lon(scale_lon(lon))), 0.0);
        }
        for lat in [-90.0, 0.0, 1.0, 90.0] {
            assert_eq!(compare_geo(lat, unscale_lat(scale_lat(lat))), 0.0);
        }
    }

    #[test]
    fn test_morton_order_follows_quadrants() {
        assert!(morton_hash(-180.0, -90.0) < morton_hash(180.0, 90.0));
        assert_eq!(morton_hash(-180.0, -90.0), 0);
    }

    #[test]
    fn test_box_predicates() {
        assert!(rect_intersects(0.0, 0.0, 2.0, 2.0, 1.0, 1.0, 3.0, 3.0));
        assert!(!rect_intersects(0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0));
        assert!(rect_within(1.0, 1.0, 2.0, 2.0, 0.0, 0.0, 3.0, 3.0));
        assert!(!rect_within(0.0, 0.0, 3.0, 3.0, 1.0, 1.0, 2.0, 2.0));

        assert!(bounding_box_contains(1.0, 1.0, 0.0, 0.0, 2.0, 2.0));
        assert!(bounding_box_contains(2.0000001, 1.0, 0.0, 0.0, 2.0, 2.0));
        assert!(!bounding_box_contains(2.1, 1.0, 0.0, 0.0, 2.0, 2.0));
    }
}
