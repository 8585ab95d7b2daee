//! Distance strings and great-circle distance.

use crate::error::{LancetError, Result};

/// Equatorial radius of the WGS84 ellipsoid, in meters.
pub const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const FLATTENING: f64 = 1.0 / 298.257223563;

/// Polar radius of the WGS84 ellipsoid, in meters.
pub const SEMI_MINOR_AXIS: f64 = SEMI_MAJOR_AXIS * (1.0 - FLATTENING);

/// Radius used to turn meters into angles on the unit sphere.
pub const EARTH_RADIUS_METERS: f64 = SEMI_MAJOR_AXIS;

struct DistanceUnit {
    conversion: f64,
    suffixes: &'static [&'static str],
}

// Longer suffixes that end in a shorter one ("km", "mm", "mi") must come
// before the unit that owns the shorter suffix ("m").
static DISTANCE_UNITS: &[DistanceUnit] = &[
    DistanceUnit {
        conversion: 0.0254,
        suffixes: &["in", "inch"],
    },
    DistanceUnit {
        conversion: 0.9144,
        suffixes: &["yd", "yards"],
    },
    DistanceUnit {
        conversion: 0.3048,
        suffixes: &["ft", "feet"],
    },
    DistanceUnit {
        conversion: 1000.0,
        suffixes: &["km", "kilometers"],
    },
    DistanceUnit {
        conversion: 1852.0,
        suffixes: &["nm", "nauticalmiles"],
    },
    DistanceUnit {
        conversion: 0.001,
        suffixes: &["mm", "millimeters"],
    },
    DistanceUnit {
        conversion: 0.01,
        suffixes: &["cm", "centimeters"],
    },
    DistanceUnit {
        conversion: 1609.344,
        suffixes: &["mi", "miles"],
    },
    DistanceUnit {
        conversion: 1.0,
        suffixes: &["m", "meters"],
    },
];

fn parse_number(s: &str, original: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|e| LancetError::geo(format!("invalid distance {original:?}: {e}")))
}

/// Parse a distance string such as `"5km"` or `"12.5mi"` into meters.
///
/// A string without a unit suffix is taken to be in meters.
pub fn parse_distance(d: &str) -> Result<f64> {
    for unit in DISTANCE_UNITS {
        for suffix in unit.suffixes {
            if let Some(prefix) = d.strip_suffix(suffix) {
                return Ok(parse_number(prefix, d)? * unit.conversion);
            }
        }
    }
    parse_number(d, d)
}

/// Return the number of meters in one of the named unit.
pub fn parse_distance_unit(u: &str) -> Result<f64> {
    DISTANCE_UNITS
        .iter()
        .find(|unit| unit.suffixes.contains(&u))
        .map(|unit| unit.conversion)
        .ok_or_else(|| LancetError::UnknownDistanceUnit(u.to_string()))
}

// Earth diameter in kilometers at the given latitude (radians).
fn earth_diameter(lat: f64) -> f64 {
    let a2 = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
    let b2 = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;
    let (sin, cos) = lat.sin_cos();
    let num = (a2 * cos).powi(2) + (b2 * sin).powi(2);
    let den = (SEMI_MAJOR_AXIS * cos).powi(2) + (SEMI_MINOR_AXIS * sin).powi(2);
    2.0 * (num / den).sqrt() / 1000.0
}

/// Great-circle distance in kilometers between two lon/lat points.
///
/// The sphere diameter is taken from the ellipsoid at the average
/// latitude of the two points. Any NaN input produces NaN.
pub fn haversin(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let x1 = lat1.to_radians();
    let x2 = lat2.to_radians();
    let h1 = 1.0 - (x1 - x2).cos();
    let h2 = 1.0 - (lon1 - lon2).to_radians().cos();
    let h = (h1 + x1.cos() * x2.cos() * h2) / 2.0;
    if h.is_nan() {
        return f64::NAN;
    }
    let avg_lat = (x1 + x2) / 2.0;
    earth_diameter(avg_lat) * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_parse_distance() {
        assert_eq!(parse_distance("5mi").unwrap(), 5.0 * 1609.344);
        assert_eq!(parse_distance("3").unwrap(), 3.0);
        assert_eq!(parse_distance("3m").unwrap(), 3.0);
        assert_eq!(parse_distance("5km").unwrap(), 5000.0);
        assert_eq!(parse_distance("2nauticalmiles").unwrap(), 3704.0);
        assert!(parse_distance("km").is_err());
        assert!(parse_distance("").is_err());
    }

    #[test]
    fn test_parse_distance_unit() {
        assert_eq!(parse_distance_unit("mi").unwrap(), 1609.344);
        assert_eq!(parse_distance_unit("m").unwrap(), 1.0);
        assert_eq!(parse_distance_unit("km").unwrap(), 1000.0);

        let err = parse_distance_unit("").unwrap_err();
        assert_eq!(err.to_string(), "unknown distance unit: ");
        let err = parse_distance_unit("kam").unwrap_err();
        assert_eq!(err.to_string(), "unknown distance unit: kam");
    }

    #[test]
    fn test_haversin() {
        let half_circle = 6378.137 * PI;
        let cases = [
            (0.0, 0.0, 0.0, 0.0, 0.0),
            (-180.0, 0.0, 180.0, 0.0, 0.0),
            (-180.0, 90.0, 180.0, 90.0, 0.0),
            (0.0, 0.0, 180.0, 0.0, half_circle),
            (-74.0059731, 40.7143528, -73.9844722, 40.759011, 5.286),
            (-74.0059731, 40.7143528, -74.007819, 40.718266, 0.4621),
            (-74.0059731, 40.7143528, -74.0088305, 40.7051157, 1.055),
            (-74.0059731, 40.7143528, -74.0, 40.7247222, 1.258),
            (-74.0059731, 40.7143528, -73.9962255, 40.731033, 2.029),
            (-74.0059731, 40.7143528, -73.95, 40.65, 8.572),
        ];
        for (lon1, lat1, lon2, lat2, want) in cases {
            let got = haversin(lon1, lat1, lon2, lat2);
            assert!(
                (got - want).abs() <= 1e-2,
                "({lon1}, {lat1}) -> ({lon2}, {lat2}): expected {want}, got {got}"
            );
        }
    }

    #[test]
    fn test_haversin_nan() {
        assert!(haversin(1.0, 1.0, f64::NAN, 1.0).is_nan());
        assert!(haversin(f64::NAN, 1.0, 1.0, 1.0).is_nan());
        assert!(haversin(1.0, f64::NAN, 1.0, 1.0).is_nan());
    }
}
