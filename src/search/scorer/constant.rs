use crate::config::SearcherOptions;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::explanation::Explanation;
use crate::search::pool::SearchContext;

/// Gives every match the same score, scaled by boost and query norm.
#[derive(Debug, Clone)]
pub struct ConstantScorer {
    constant: f64,
    boost: f64,
    options: SearcherOptions,
    query_norm: f64,
    query_weight: f64,
    query_weight_explanation: Option<Explanation>,
}

impl ConstantScorer {
    pub fn new(constant: f64, boost: f64, options: SearcherOptions) -> Self {
        ConstantScorer {
            constant,
            boost,
            options,
            query_norm: 1.0,
            query_weight: 1.0,
            query_weight_explanation: None,
        }
    }

    pub fn weight(&self) -> f64 {
        self.boost * self.boost
    }

    pub fn set_query_norm(&mut self, qnorm: f64) {
        self.query_norm = qnorm;
        self.query_weight = self.boost * self.query_norm;

        if self.options.explain {
            self.query_weight_explanation = Some(Explanation::with_children(
                self.query_weight,
                format!("ConstantScore()^{:.6}", self.boost),
                vec![
                    Explanation::new(self.boost, "boost"),
                    Explanation::new(self.query_norm, "queryNorm"),
                ],
            ));
        }
    }

    pub fn score(&self, ctx: &mut SearchContext, id: &IndexInternalId) -> DocumentMatch {
        let mut score = self.constant;
        let mut explanation = self
            .options
            .explain
            .then(|| Explanation::new(score, "ConstantScore()"));

        if self.query_weight != 1.0 {
            score *= self.query_weight;
            explanation = explanation.map(|constant| {
                Explanation::with_children(
                    score,
                    format!("weight(^{:.6}), product of:", self.boost),
                    vec![
                        self.query_weight_explanation.clone().unwrap_or_default(),
                        constant,
                    ],
                )
            });
        }

        let mut rv = ctx.pool.get();
        rv.index_internal_id.set(id.as_bytes());
        rv.score = score;
        rv.expl = explanation;
        rv
    }
}
