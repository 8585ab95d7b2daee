use crate::config::SearcherOptions;
use crate::search::document_match::{DocumentMatch, merge_locations};
use crate::search::explanation::Explanation;
use crate::search::pool::SearchContext;

/// Sums the scores of matches that all point at the same document.
#[derive(Debug, Clone, Copy)]
pub struct ConjunctionQueryScorer {
    options: SearcherOptions,
}

impl ConjunctionQueryScorer {
    pub fn new(options: SearcherOptions) -> Self {
        ConjunctionQueryScorer { options }
    }

    /// Combine `constituents` into the first of them; the rest go back to
    /// the pool.
    pub fn score(&self, ctx: &mut SearchContext, constituents: Vec<DocumentMatch>) -> DocumentMatch {
        combine(ctx, constituents, self.options.explain)
    }
}

/// Sum constituent scores into the first constituent and merge their
/// locations. Returns the combined match and, when explaining, a
/// `sum of:` node is attached.
pub(crate) fn combine(
    ctx: &mut SearchContext,
    constituents: Vec<DocumentMatch>,
    explain: bool,
) -> DocumentMatch {
    let mut constituents = constituents.into_iter();
    let Some(mut rv) = constituents.next() else {
        return ctx.pool.get();
    };

    let mut sum = rv.score;
    let mut children = Vec::new();
    if explain {
        children.extend(rv.expl.take());
    }
    for mut other in constituents {
        sum += other.score;
        if explain {
            children.extend(other.expl.take());
        }
        merge_locations(&mut rv.locations, std::mem::take(&mut other.locations));
        ctx.pool.put(other);
    }

    rv.score = sum;
    rv.expl = explain.then(|| Explanation::with_children(sum, "sum of:", children));
    rv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexInternalId;
    use crate::search::document_match::{FieldTermLocationMap, Location, TermLocationMap};

    fn hit(score: f64, field: &str, term: &str) -> DocumentMatch {
        let mut terms = TermLocationMap::new();
        terms.insert(term.to_string(), vec![Location::default()]);
        let mut locations = FieldTermLocationMap::new();
        locations.insert(field.to_string(), terms);
        DocumentMatch {
            index_internal_id: IndexInternalId::from("1"),
            score,
            expl: Some(Explanation::new(score, term)),
            locations,
            ..Default::default()
        }
    }

    #[test]
    fn test_sum_and_merge() {
        let mut ctx = SearchContext::new(0);
        let scorer = ConjunctionQueryScorer::new(SearcherOptions::default().with_explain(true));
        let rv = scorer.score(
            &mut ctx,
            vec![hit(1.0, "desc", "beer"), hit(2.5, "name", "marty")],
        );
        assert_eq!(rv.score, 3.5);
        assert_eq!(rv.index_internal_id, IndexInternalId::from("1"));
        let expl = rv.expl.unwrap();
        assert_eq!(expl.message, "sum of:");
        assert_eq!(expl.children.len(), 2);
        assert!(rv.locations.contains_key("desc"));
        assert!(rv.locations.contains_key("name"));
        assert_eq!(ctx.pool.available(), 1);
    }

    #[test]
    fn test_single_constituent() {
        let mut ctx = SearchContext::new(0);
        let scorer = ConjunctionQueryScorer::new(SearcherOptions::default());
        let rv = scorer.score(&mut ctx, vec![hit(1.5, "desc", "beer")]);
        assert_eq!(rv.score, 1.5);
        assert!(rv.expl.is_none());
        assert_eq!(rv.locations["desc"].len(), 1);
    }
}
