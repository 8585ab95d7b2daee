//! Geospatial support: distances, Morton hashing and GeoJSON shapes.
//!
//! Points are indexed as Morton-interleaved, prefix-coded terms and
//! searched with [`crate::search::searcher::GeoBoundingBoxSearcher`] and
//! [`crate::search::searcher::GeoPointDistanceSearcher`]. Shapes are
//! indexed by type and stored as doc values (see [`GLUE_BYTES`]); the
//! relation engine in [`relation`] decides `intersects`, `contains` and
//! `within` between a query shape and each candidate document.

pub mod bbox;
pub mod distance;
pub mod geojson;
pub mod morton;
pub mod relation;
pub mod shape;
pub(crate) mod sphere;

pub use bbox::{compute_bounding_box, degrees_to_radians, normalize_lat, normalize_lon, radians_to_degrees};
pub use distance::{EARTH_RADIUS_METERS, haversin, parse_distance, parse_distance_unit};
pub use geojson::{
    GLUE_BYTES, extract_geo_point, new_geo_circle_shape, new_geo_json_shape,
    new_geometry_collection, parse_geojson_shape,
};
pub use morton::{
    bounding_box_contains, compare_geo, morton_hash, morton_unhash_lat, morton_unhash_lon,
    rect_intersects, rect_within,
};
pub use relation::filter_geo_shapes_on_relation;
pub use shape::{Coordinates, GeoShape, Position};
