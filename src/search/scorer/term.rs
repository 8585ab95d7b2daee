//! TF-IDF scoring of single term matches.

use lazy_static::lazy_static;

use crate::config::SearcherOptions;
use crate::index::reader::TermFieldDoc;
use crate::search::document_match::{DocumentMatch, Location, add_location};
use crate::search::explanation::Explanation;
use crate::search::pool::SearchContext;

/// Term frequencies below this use a precomputed square root.
pub const MAX_SQRT_CACHE: u64 = 64;

lazy_static! {
    static ref SQRT_CACHE: Vec<f64> = (0..MAX_SQRT_CACHE).map(|i| (i as f64).sqrt()).collect();
}

fn term_frequency(freq: u64) -> f64 {
    if freq < MAX_SQRT_CACHE {
        SQRT_CACHE[freq as usize]
    } else {
        (freq as f64).sqrt()
    }
}

/// Scores postings of one term in one field.
///
/// `score = sqrt(freq) * norm * idf`, multiplied by the query weight
/// `boost * idf * queryNorm` once a query norm other than the identity has
/// been applied.
#[derive(Debug, Clone)]
pub struct TermQueryScorer {
    query_term: String,
    query_field: String,
    query_boost: f64,
    doc_term: u64,
    doc_total: u64,
    idf: f64,
    options: SearcherOptions,
    idf_explanation: Option<Explanation>,
    query_norm: f64,
    query_weight: f64,
    query_weight_explanation: Option<Explanation>,
}

impl TermQueryScorer {
    pub fn new(
        query_term: &[u8],
        query_field: &str,
        query_boost: f64,
        doc_total: u64,
        doc_term: u64,
        options: SearcherOptions,
    ) -> Self {
        let idf = 1.0 + (doc_total as f64 / (doc_term as f64 + 1.0)).ln();
        let idf_explanation = options.explain.then(|| {
            Explanation::new(idf, format!("idf(docFreq={doc_term}, maxDocs={doc_total})"))
        });
        TermQueryScorer {
            query_term: String::from_utf8_lossy(query_term).into_owned(),
            query_field: query_field.to_string(),
            query_boost,
            doc_term,
            doc_total,
            idf,
            options,
            idf_explanation,
            query_norm: 1.0,
            query_weight: 1.0,
            query_weight_explanation: None,
        }
    }

    pub fn idf(&self) -> f64 {
        self.idf
    }

    pub fn doc_term(&self) -> u64 {
        self.doc_term
    }

    pub fn doc_total(&self) -> u64 {
        self.doc_total
    }

    /// Squared contribution of this term to the query norm.
    pub fn weight(&self) -> f64 {
        let sum = self.query_boost * self.idf;
        sum * sum
    }

    pub fn set_query_norm(&mut self, qnorm: f64) {
        self.query_norm = qnorm;
        self.query_weight = self.query_boost * self.idf * self.query_norm;

        if self.options.explain {
            let children = vec![
                Explanation::new(self.query_boost, "boost"),
                self.idf_explanation.clone().unwrap_or_default(),
                Explanation::new(self.query_norm, "queryNorm"),
            ];
            self.query_weight_explanation = Some(Explanation::with_children(
                self.query_weight,
                format!(
                    "queryWeight({}:{}^{:.6}), product of:",
                    self.query_field, self.query_term, self.query_boost
                ),
                children,
            ));
        }
    }

    /// The final score a posting with this `freq` and `norm` would get.
    pub fn score_freq_norm(&self, freq: u64, norm: f64) -> f64 {
        let score = term_frequency(freq) * norm * self.idf;
        if self.query_weight != 1.0 {
            score * self.query_weight
        } else {
            score
        }
    }

    /// Score one posting into a match drawn from the context's pool.
    pub fn score(&self, ctx: &mut SearchContext, term_match: &TermFieldDoc) -> DocumentMatch {
        let tf = term_frequency(term_match.freq);
        let mut score = tf * term_match.norm * self.idf;

        let mut explanation = self.options.explain.then(|| {
            Explanation::with_children(
                score,
                format!(
                    "fieldWeight({}:{} in {}), product of:",
                    self.query_field, self.query_term, term_match.id
                ),
                vec![
                    Explanation::new(
                        tf,
                        format!(
                            "tf(termFreq({}:{})={}",
                            self.query_field, self.query_term, term_match.freq
                        ),
                    ),
                    Explanation::new(
                        term_match.norm,
                        format!("fieldNorm(field={}, doc={})", self.query_field, term_match.id),
                    ),
                    self.idf_explanation.clone().unwrap_or_default(),
                ],
            )
        });

        if self.query_weight != 1.0 {
            score *= self.query_weight;
            explanation = explanation.map(|field_weight| {
                Explanation::with_children(
                    score,
                    format!(
                        "weight({}:{}^{:.6} in {}), product of:",
                        self.query_field, self.query_term, self.query_boost, term_match.id
                    ),
                    vec![
                        self.query_weight_explanation.clone().unwrap_or_default(),
                        field_weight,
                    ],
                )
            });
        }

        let mut rv = ctx.pool.get();
        rv.index_internal_id.set(term_match.id.as_bytes());
        rv.score = score;
        rv.expl = explanation;

        for vector in &term_match.vectors {
            let term_locations = rv.locations.entry(vector.field.clone()).or_default();
            add_location(
                term_locations,
                &self.query_term,
                Location {
                    pos: vector.pos,
                    start: vector.start,
                    end: vector.end,
                    array_positions: vector.array_positions.clone(),
                },
            );
        }
        rv
    }
}
