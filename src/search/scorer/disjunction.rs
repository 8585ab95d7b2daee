use crate::config::SearcherOptions;
use crate::search::document_match::DocumentMatch;
use crate::search::explanation::Explanation;
use crate::search::pool::SearchContext;
use crate::search::scorer::conjunction::combine;

/// Sums the scores of the matching clauses of a disjunction and scales the
/// sum by the fraction of clauses that matched.
#[derive(Debug, Clone, Copy)]
pub struct DisjunctionQueryScorer {
    options: SearcherOptions,
}

impl DisjunctionQueryScorer {
    pub fn new(options: SearcherOptions) -> Self {
        DisjunctionQueryScorer { options }
    }

    pub fn score(
        &self,
        ctx: &mut SearchContext,
        constituents: Vec<DocumentMatch>,
        count_matched: usize,
        count_total: usize,
    ) -> DocumentMatch {
        let mut rv = combine(ctx, constituents, self.options.explain);

        let coord = if count_total == 0 {
            0.0
        } else {
            count_matched as f64 / count_total as f64
        };
        let sum = rv.score;
        rv.score = sum * coord;
        if self.options.explain {
            let raw = rv
                .expl
                .take()
                .unwrap_or_else(|| Explanation::new(sum, "sum of:"));
            rv.expl = Some(Explanation::with_children(
                rv.score,
                "product of:",
                vec![
                    raw,
                    Explanation::new(coord, format!("coord({count_matched}/{count_total})")),
                ],
            ));
        }
        rv
    }
}
