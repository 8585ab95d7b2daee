use std::sync::Arc;

use log::{debug, warn};

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::geo::{GeoShape, filter_geo_shapes_on_relation};
use crate::index::IndexReader;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{
    FilterFunc, FilteringSearcher, MultiTermSearcher, delegate_searcher,
};

const RELATIONS: [&str; 3] = ["intersects", "contains", "within"];

/// Matches documents whose stored shape stands in `relation` to a query
/// shape.
///
/// Every document with a shape in the field is a candidate. Each candidate's
/// stored GeoJSON is then checked exactly. A check that errors counts as a
/// non-match.
#[derive(Debug)]
pub struct GeoShapeSearcher {
    searcher: FilteringSearcher,
}

impl GeoShapeSearcher {
    pub fn new(
        index_reader: Arc<dyn IndexReader>,
        shape: GeoShape,
        relation: &str,
        field: &str,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        if !RELATIONS.contains(&relation) {
            return Err(LancetError::UnknownRelation(relation.to_string()));
        }

        // shape fields index one term per shape type
        let dict = index_reader.field_dict(field)?;
        let terms = collect_terms(dict, SearcherConfig::default(), |_| true)?;
        debug!(
            "geo shape {} {relation} in field {field}: {} shape types",
            shape.shape_type(),
            terms.len()
        );
        let candidates = MultiTermSearcher::new(
            index_reader.as_ref(),
            &terms,
            field,
            boost,
            options,
            SearcherConfig::default(),
        )?;

        let filter = relation_filter(index_reader, field, shape, relation);
        Ok(GeoShapeSearcher {
            searcher: FilteringSearcher::new(Box::new(candidates), filter),
        })
    }
}

delegate_searcher!(GeoShapeSearcher, searcher);

fn relation_filter(
    index_reader: Arc<dyn IndexReader>,
    field: &str,
    shape: GeoShape,
    relation: &str,
) -> FilterFunc {
    let field = field.to_string();
    let relation = relation.to_string();
    Box::new(move |_: &mut SearchContext, dm: &DocumentMatch| {
        let mut found = false;
        let result =
            index_reader.visit_doc_values(&dm.index_internal_id, &field, &mut |doc_shape| {
                if found {
                    return;
                }
                match filter_geo_shapes_on_relation(&shape, doc_shape, &relation) {
                    Ok(matched) => found = matched,
                    Err(e) => warn!("geo shape check failed for {}: {e}", dm.index_internal_id),
                }
            });
        if let Err(e) = result {
            warn!("reading shapes of {} failed: {e}", dm.index_internal_id);
            return false;
        }
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Document, Field, UpsideDownIndex};
    use crate::search::searcher::test_util::ids;

    fn square(min: f64, max: f64) -> GeoShape {
        GeoShape::polygon(vec![vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]])
        .unwrap()
    }

    fn shapes_reader() -> Arc<dyn IndexReader> {
        let index = UpsideDownIndex::in_memory().unwrap();
        let docs = vec![
            Document::new("1").with_field(Field::geo_shape(
                "area",
                GeoShape::point(vec![4.9, 52.37]).unwrap(),
            )),
            Document::new("2").with_field(Field::geo_shape("area", square(0.0, 10.0))),
            Document::new("3").with_field(Field::geo_shape(
                "area",
                GeoShape::line_string(vec![vec![20.0, 20.0], vec![30.0, 30.0]]).unwrap(),
            )),
            Document::new("4").with_field(Field::text("name", "no shape")),
        ];
        for doc in &docs {
            index.update(doc).unwrap();
        }
        Arc::new(index.reader().unwrap())
    }

    fn search(shape: GeoShape, relation: &str) -> Vec<String> {
        let mut searcher = GeoShapeSearcher::new(
            shapes_reader(),
            shape,
            relation,
            "area",
            1.0,
            SearcherOptions::default(),
        )
        .unwrap();
        ids(&mut searcher)
    }

    #[test]
    fn test_polygon_query() {
        assert_eq!(search(square(-1.0, 12.0), "intersects"), vec!["2"]);
        assert_eq!(search(square(-1.0, 12.0), "within"), vec!["2"]);
        assert!(search(square(-1.0, 12.0), "contains").is_empty());
    }

    #[test]
    fn test_point_query() {
        let point = || GeoShape::point(vec![5.0, 5.0]).unwrap();
        assert_eq!(search(point(), "intersects"), vec!["2"]);
        assert_eq!(search(point(), "contains"), vec!["2"]);

        let amsterdam = GeoShape::point(vec![4.9, 52.37]).unwrap();
        assert_eq!(search(amsterdam, "intersects"), vec!["1"]);
    }

    #[test]
    fn test_unknown_relation() {
        let err = GeoShapeSearcher::new(
            shapes_reader(),
            square(0.0, 1.0),
            "touches",
            "area",
            1.0,
            SearcherOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LancetError::UnknownRelation(_)));
    }
}
