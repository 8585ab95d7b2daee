use std::sync::Arc;

use log::{debug, trace};

use crate::config::SearcherOptions;
use crate::error::{LancetError, Result};
use crate::geo::{compute_bounding_box, haversin};
use crate::index::IndexReader;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::geo_bounding_box::visit_geo_points;
use crate::search::searcher::{
    FilterFunc, FilteringSearcher, GeoBoundingBoxSearcher, delegate_searcher,
};

/// Matches documents with a geo point within `distance` meters of a center.
///
/// Candidates come from the bounding box of the circle, without exact
/// boundary checks, and are then filtered by great-circle distance.
#[derive(Debug)]
pub struct GeoPointDistanceSearcher {
    searcher: FilteringSearcher,
}

impl GeoPointDistanceSearcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: Arc<dyn IndexReader>,
        center_lon: f64,
        center_lat: f64,
        distance: f64,
        field: &str,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(LancetError::invalid_argument(format!(
                "invalid distance: {distance}"
            )));
        }

        let (ul_lon, ul_lat, lr_lon, lr_lat) =
            compute_bounding_box(center_lon, center_lat, distance);
        debug!(
            "distance {distance}m from ({center_lon}, {center_lat}) in field {field}: box ({ul_lon}, {ul_lat}) ({lr_lon}, {lr_lat})"
        );

        // a box with ul_lon > lr_lon crosses the date line and is split
        let box_searcher = GeoBoundingBoxSearcher::new(
            Arc::clone(&index_reader),
            ul_lon,
            lr_lat,
            lr_lon,
            ul_lat,
            field,
            boost,
            options,
            false,
        )?;

        let filter = distance_filter(index_reader, field, center_lon, center_lat, distance);
        Ok(GeoPointDistanceSearcher {
            searcher: FilteringSearcher::new(Box::new(box_searcher), filter),
        })
    }
}

delegate_searcher!(GeoPointDistanceSearcher, searcher);

fn distance_filter(
    index_reader: Arc<dyn IndexReader>,
    field: &str,
    center_lon: f64,
    center_lat: f64,
    distance: f64,
) -> FilterFunc {
    let field = field.to_string();
    let max_km = distance / 1000.0;
    Box::new(move |_: &mut SearchContext, dm: &DocumentMatch| {
        let mut near = false;
        let result = visit_geo_points(index_reader.as_ref(), dm, &field, &mut |lon, lat| {
            near |= haversin(lon, lat, center_lon, center_lat) <= max_km;
        });
        if let Err(e) = result {
            trace!("geo point lookup failed for {}: {e}", dm.index_internal_id);
            return false;
        }
        near
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::searcher::geo_bounding_box::tests::cities_reader;
    use crate::search::searcher::test_util::ids;

    fn search(lon: f64, lat: f64, distance: f64) -> Vec<String> {
        let mut searcher = GeoPointDistanceSearcher::new(
            cities_reader(),
            lon,
            lat,
            distance,
            "loc",
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        ids(&mut searcher)
    }

    #[test]
    fn test_point_distance() {
        // Amsterdam to Paris is about 430km
        assert_eq!(search(4.9, 52.37, 100_000.0), vec!["1"]);
        assert_eq!(search(4.9, 52.37, 500_000.0), vec!["1", "2"]);
        assert!(search(-30.0, -50.0, 100_000.0).is_empty());
    }

    #[test]
    fn test_across_date_line() {
        assert_eq!(search(180.0, -16.0, 1_500_000.0), vec!["5", "6"]);
    }

    #[test]
    fn test_negative_distance() {
        let err = GeoPointDistanceSearcher::new(
            cities_reader(),
            0.0,
            0.0,
            -1.0,
            "loc",
            1.0,
            SearcherOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LancetError::InvalidArgument(_)));
    }
}
