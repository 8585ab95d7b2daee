//! Bounding boxes around circles on the WGS84 ellipsoid.

use super::distance::{FLATTENING, SEMI_MAJOR_AXIS, SEMI_MINOR_AXIS};

/// Convert degrees to radians.
pub fn degrees_to_radians(d: f64) -> f64 {
    d.to_radians()
}

/// Convert radians to degrees.
pub fn radians_to_degrees(r: f64) -> f64 {
    r.to_degrees()
}

/// Compute the box around a circle of `radius` meters centred on the point.
///
/// Returns `(upper_left_lon, upper_left_lat, lower_right_lon, lower_right_lat)`.
/// When the circle crosses the date line, the upper-left longitude is
/// greater than the lower-right longitude.
pub fn compute_bounding_box(center_lon: f64, center_lat: f64, radius: f64) -> (f64, f64, f64, f64) {
    let (_, top_lat) = point_from_lon_lat_bearing(center_lon, center_lat, 0.0, radius);
    let (right_lon, _) = point_from_lon_lat_bearing(center_lon, center_lat, 90.0, radius);
    let (_, bottom_lat) = point_from_lon_lat_bearing(center_lon, center_lat, 180.0, radius);
    let (left_lon, _) = point_from_lon_lat_bearing(center_lon, center_lat, 270.0, radius);
    (
        normalize_lon(left_lon),
        normalize_lat(top_lat),
        normalize_lon(right_lon),
        normalize_lat(bottom_lat),
    )
}

// Vincenty's direct formula: travel `dist` meters from lon/lat along the
// initial bearing (degrees) and return the destination.
fn point_from_lon_lat_bearing(lon: f64, lat: f64, bearing: f64, dist: f64) -> (f64, f64) {
    let a2 = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
    let b2 = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;

    let alpha1 = bearing.to_radians();
    let (sin_a1, cos_a1) = alpha1.sin_cos();
    let tan_u1 = (1.0 - FLATTENING) * lat.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let sig1 = tan_u1.atan2(cos_a1);
    let sin_alpha = cos_u1 * sin_a1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a2 - b2) / b2;
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = |sigma: f64| {
        let cos_2sm = (2.0 * sig1 + sigma).cos();
        let sin_sigma = sigma.sin();
        let cos_sigma = sigma.cos();
        let delta = b
            * sin_sigma
            * (cos_2sm
                + (b / 4.0)
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                        - (b / 6.0)
                            * cos_2sm
                            * (-1.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sm * cos_2sm)));
        (delta, cos_2sm, sin_sigma, cos_sigma)
    };

    let base = dist / (SEMI_MINOR_AXIS * a);
    let mut sigma = base;
    let (mut delta, mut cos_2sm, mut sin_sigma, mut cos_sigma) = delta_sigma(sigma);
    let mut sigma_p = sigma;
    sigma = base + delta;
    // Bounded so a pathological input cannot spin forever.
    for _ in 0..200 {
        if (sigma - sigma_p).abs() <= 1e-12 {
            break;
        }
        (delta, cos_2sm, sin_sigma, cos_sigma) = delta_sigma(sigma);
        sigma_p = sigma;
        sigma = base + delta;
    }

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_a1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_a1)
        .atan2((1.0 - FLATTENING) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_a1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_a1);
    let c = FLATTENING / 16.0 * cos_sq_alpha * (4.0 + FLATTENING * (4.0 - 3.0 * cos_sq_alpha));
    let lam = lambda
        - (1.0 - c)
            * FLATTENING
            * sin_alpha
            * (sigma
                + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));

    (lon + lam.to_degrees(), lat2.to_degrees())
}

/// Wrap a longitude into [-180, 180].
pub fn normalize_lon(lon_deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon_deg) {
        return lon_deg;
    }
    let off = (lon_deg + 180.0) % 360.0;
    if off < 0.0 {
        180.0 + off
    } else if off == 0.0 && lon_deg > 0.0 {
        180.0
    } else {
        -180.0 + off
    }
}

/// Fold a latitude back into [-90, 90].
pub fn normalize_lat(lat_deg: f64) -> f64 {
    if (-90.0..=90.0).contains(&lat_deg) {
        return lat_deg;
    }
    let off = ((lat_deg + 90.0) % 360.0).abs();
    if off <= 180.0 {
        off - 90.0
    } else {
        (360.0 - off) - 90.0
    }
}
