//! Bounding-box search over morton-hashed geo point terms.
//!
//! The box is decomposed into morton cells, top down. A cell that lies
//! entirely inside the box becomes one prefix-coded term at the cell's
//! shift. Cells that only overlap the box are split until the detail level,
//! where they are kept as boundary terms whose hits are checked against the
//! exact point.

use std::sync::Arc;

use log::{debug, trace};

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::Result;
use crate::geo::morton::GEO_BITS;
use crate::geo::{bounding_box_contains, morton_unhash_lat, morton_unhash_lon, rect_intersects, rect_within};
use crate::index::IndexReader;
use crate::index::upside_down::GEO_PRECISION_STEP;
use crate::numeric::{PrefixCoded, valid_prefix_coded_term};
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::{
    DisjunctionSearcher, FilterFunc, FilteringSearcher, MatchNoneSearcher, MultiTermSearcher,
    Searcher, delegate_searcher,
};

const GEO_MAX_SHIFT: u32 = GEO_PRECISION_STEP * 4;
const GEO_DETAIL_LEVEL: u32 = ((GEO_BITS << 1) - GEO_MAX_SHIFT) / 2;

#[derive(Debug, Clone, Copy)]
struct Rect {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

/// Cell terms covering a box.
#[derive(Debug, Default)]
struct GeoRange {
    on_boundary: Vec<Vec<u8>>,
    not_on_boundary: Vec<Vec<u8>>,
}

/// Matches documents whose geo point lies in a box.
///
/// A box with `min_lon > max_lon` crosses the date line and is searched as
/// two boxes. With `check_boundaries` off, hits from boundary cells are
/// returned without checking the exact point, which may include points
/// slightly outside the box.
#[derive(Debug)]
pub struct GeoBoundingBoxSearcher {
    searcher: Box<dyn Searcher>,
}

impl GeoBoundingBoxSearcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: Arc<dyn IndexReader>,
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        check_boundaries: bool,
    ) -> Result<Self> {
        let searcher: Box<dyn Searcher> = if min_lon > max_lon {
            let left = Rect {
                min_lon: -180.0,
                min_lat,
                max_lon,
                max_lat,
            };
            let right = Rect {
                min_lon,
                min_lat,
                max_lon: 180.0,
                max_lat,
            };
            let searchers = vec![
                box_searcher(&index_reader, left, field, boost, options, check_boundaries)?,
                box_searcher(&index_reader, right, field, boost, options, check_boundaries)?,
            ];
            Box::new(DisjunctionSearcher::new(
                searchers,
                0,
                options,
                SearcherConfig::default(),
            )?)
        } else {
            let rect = Rect {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            };
            box_searcher(&index_reader, rect, field, boost, options, check_boundaries)?
        };
        Ok(GeoBoundingBoxSearcher { searcher })
    }
}

delegate_searcher!(GeoBoundingBoxSearcher, searcher);

fn box_searcher(
    index_reader: &Arc<dyn IndexReader>,
    rect: Rect,
    field: &str,
    boost: f64,
    options: SearcherOptions,
    check_boundaries: bool,
) -> Result<Box<dyn Searcher>> {
    let mut range = GeoRange::default();
    compute_geo_range(&mut range, 0, (GEO_BITS << 1) - 1, &rect, check_boundaries)?;
    debug!(
        "geo box {rect:?} in field {field}: {} boundary cells, {} inner cells",
        range.on_boundary.len(),
        range.not_on_boundary.len()
    );

    // cell terms are not subject to the clause ceiling
    let config = SearcherConfig::default();
    let mut searchers: Vec<Box<dyn Searcher>> = Vec::with_capacity(2);
    if !range.on_boundary.is_empty() {
        let raw = MultiTermSearcher::new(
            index_reader.as_ref(),
            &range.on_boundary,
            field,
            boost,
            options,
            config,
        )?;
        let filter = rect_filter(Arc::clone(index_reader), field, rect);
        searchers.push(Box::new(FilteringSearcher::new(Box::new(raw), filter)));
    }
    if !range.not_on_boundary.is_empty() {
        searchers.push(Box::new(MultiTermSearcher::new(
            index_reader.as_ref(),
            &range.not_on_boundary,
            field,
            boost,
            options,
            config,
        )?));
    }

    match searchers.len() {
        0 => Ok(Box::new(MatchNoneSearcher::new())),
        1 => Ok(searchers.remove(0)),
        _ => Ok(Box::new(DisjunctionSearcher::new(searchers, 0, options, config)?)),
    }
}

fn compute_geo_range(
    rv: &mut GeoRange,
    term: u64,
    shift: u32,
    rect: &Rect,
    check_boundaries: bool,
) -> Result<()> {
    let split = term | 1u64 << shift;
    let upper_max = if shift < 63 {
        term | ((1u64 << (shift + 1)) - 1)
    } else {
        u64::MAX
    };
    let lower_max = split - 1;
    relate_and_recurse(rv, term, lower_max, shift, rect, check_boundaries)?;
    relate_and_recurse(rv, split, upper_max, shift, rect, check_boundaries)
}

fn relate_and_recurse(
    rv: &mut GeoRange,
    start: u64,
    end: u64,
    res: u32,
    rect: &Rect,
    check_boundaries: bool,
) -> Result<()> {
    let min_lon = morton_unhash_lon(start);
    let min_lat = morton_unhash_lat(start);
    let max_lon = morton_unhash_lon(end);
    let max_lat = morton_unhash_lat(end);

    let level = ((GEO_BITS << 1) - res) >> 1;

    let within = res % GEO_PRECISION_STEP == 0
        && rect_within(
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            rect.min_lon,
            rect.min_lat,
            rect.max_lon,
            rect.max_lat,
        );
    let intersects = || {
        rect_intersects(
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            rect.min_lon,
            rect.min_lat,
            rect.max_lon,
            rect.max_lat,
        )
    };

    if within || (level == GEO_DETAIL_LEVEL && intersects()) {
        let term = PrefixCoded::new_int64(start as i64, res)?.into_bytes();
        if !within && check_boundaries {
            rv.on_boundary.push(term);
        } else {
            rv.not_on_boundary.push(term);
        }
    } else if level < GEO_DETAIL_LEVEL && intersects() {
        compute_geo_range(rv, start, res - 1, rect, check_boundaries)?;
    }
    Ok(())
}

/// Visit the full-precision point terms of `field` in a document.
pub(crate) fn visit_geo_points(
    index_reader: &dyn IndexReader,
    dm: &DocumentMatch,
    field: &str,
    visitor: &mut dyn FnMut(f64, f64),
) -> Result<()> {
    index_reader.document_visit_field_terms(&dm.index_internal_id, &[field], &mut |_, term| {
        if valid_prefix_coded_term(term) != Some(0) {
            return;
        }
        if let Ok(hash) = PrefixCoded::from_bytes(term.to_vec()).int64() {
            let hash = hash as u64;
            visitor(morton_unhash_lon(hash), morton_unhash_lat(hash));
        }
    })
}

fn rect_filter(index_reader: Arc<dyn IndexReader>, field: &str, rect: Rect) -> FilterFunc {
    let field = field.to_string();
    Box::new(move |_: &mut SearchContext, dm: &DocumentMatch| {
        let mut inside = false;
        let result = visit_geo_points(index_reader.as_ref(), dm, &field, &mut |lon, lat| {
            inside |= bounding_box_contains(
                lon,
                lat,
                rect.min_lon,
                rect.min_lat,
                rect.max_lon,
                rect.max_lat,
            );
        });
        if let Err(e) = result {
            trace!("geo point lookup failed for {}: {e}", dm.index_internal_id);
            return false;
        }
        inside
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::index::{Document, Field, UpsideDownIndex};
    use crate::search::searcher::test_util::ids;

    /// Six cities, two of them on either side of the date line.
    pub fn cities_reader() -> Arc<dyn IndexReader> {
        let index = UpsideDownIndex::in_memory().unwrap();
        for (id, lon, lat) in [
            ("1", 4.9, 52.37),
            ("2", 2.35, 48.86),
            ("3", -74.0, 40.7),
            ("4", 151.2, -33.87),
            ("5", 178.4, -18.1),
            ("6", -171.8, -13.8),
        ] {
            index
                .update(&Document::new(id).with_field(Field::geo_point("loc", lon, lat)))
                .unwrap();
        }
        Arc::new(index.reader().unwrap())
    }

    fn search(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Vec<String> {
        let mut searcher = GeoBoundingBoxSearcher::new(
            cities_reader(),
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            "loc",
            1.0,
            SearcherOptions::default(),
            true,
        )
        .unwrap();
        ids(&mut searcher)
    }

    #[test]
    fn test_detail_level() {
        assert_eq!(GEO_MAX_SHIFT, 36);
        assert_eq!(GEO_DETAIL_LEVEL, 14);
    }

    #[test]
    fn test_whole_world_is_two_cells() {
        let mut range = GeoRange::default();
        let world = Rect {
            min_lon: -180.0,
            min_lat: -90.0,
            max_lon: 180.0,
            max_lat: 90.0,
        };
        compute_geo_range(&mut range, 0, 63, &world, true).unwrap();
        assert!(range.on_boundary.is_empty());
        assert_eq!(range.not_on_boundary.len(), 2);
        assert_eq!(valid_prefix_coded_term(&range.not_on_boundary[0]), Some(63));
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(search(-10.0, 40.0, 20.0, 60.0), vec!["1", "2"]);
        assert_eq!(search(3.0, 40.0, 20.0, 60.0), vec!["1"]);
        assert_eq!(search(-180.0, -90.0, 180.0, 90.0), vec!["1", "2", "3", "4", "5", "6"]);
        assert!(search(-30.0, -60.0, -20.0, -50.0).is_empty());
    }

    #[test]
    fn test_date_line() {
        assert_eq!(search(170.0, -25.0, -165.0, -10.0), vec!["5", "6"]);
    }
}
