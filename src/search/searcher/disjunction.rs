use bit_vec::BitVec;
use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::DisjunctionQueryScorer;
use crate::search::searcher::{Searcher, close_all, compute_query_norm};

/// Matches documents that at least `min` children match.
///
/// With `min == 0` this is a plain OR. Scores are the sum over the children
/// that matched, scaled by the fraction of children that matched.
#[derive(Debug)]
pub struct DisjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    query_norm: f64,
    currs: Vec<Option<DocumentMatch>>,
    current_id: Option<IndexInternalId>,
    scorer: DisjunctionQueryScorer,
    min: usize,
    matching: BitVec,
    initialized: bool,
}

impl DisjunctionSearcher {
    /// Create a new disjunction.
    ///
    /// Fails with [`LancetError::TooManyClauses`] before touching any reader
    /// when `searchers` exceeds the configured clause ceiling.
    pub fn new(
        mut searchers: Vec<Box<dyn Searcher>>,
        min: usize,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        if config.too_many_clauses(searchers.len()) {
            let _ = close_all(searchers.iter_mut());
            return Err(LancetError::too_many_clauses(config.max_clause_count));
        }

        // stable, so equal counts keep their input order
        searchers.sort_by(|a, b| b.count().cmp(&a.count()));
        let query_norm = compute_query_norm(searchers.iter_mut());
        debug!(
            "disjunction over {} searchers, min {min}, query norm {query_norm}",
            searchers.len()
        );

        let n = searchers.len();
        Ok(DisjunctionSearcher {
            searchers,
            query_norm,
            currs: (0..n).map(|_| None).collect(),
            current_id: None,
            scorer: DisjunctionQueryScorer::new(options),
            min,
            matching: BitVec::from_elem(n, false),
            initialized: false,
        })
    }

    pub fn query_norm(&self) -> f64 {
        self.query_norm
    }

    fn init_searchers(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for (curr, searcher) in self.currs.iter_mut().zip(self.searchers.iter_mut()) {
            if let Some(old) = curr.take() {
                ctx.pool.put(old);
            }
            *curr = searcher.next(ctx)?;
        }
        self.current_id = self.next_smallest_id();
        self.initialized = true;
        Ok(())
    }

    fn next_smallest_id(&self) -> Option<IndexInternalId> {
        self.currs
            .iter()
            .flatten()
            .map(|curr| &curr.index_internal_id)
            .min()
            .cloned()
    }
}

impl Searcher for DisjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        // child scores only add up, so a floor on each child would lose hits
        ctx.low_score_filter = 0.0;

        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        let total = self.searchers.len();
        while let Some(current_id) = self.current_id.take() {
            let mut constituents = Vec::new();
            for (i, curr) in self.currs.iter_mut().enumerate() {
                let is_match = curr
                    .as_ref()
                    .is_some_and(|c| c.index_internal_id == current_id);
                self.matching.set(i, is_match);
                if is_match {
                    constituents.extend(curr.take());
                }
            }

            let matched = constituents.len();
            let rv = if matched >= self.min {
                Some(self.scorer.score(ctx, constituents, matched, total))
            } else {
                for dm in constituents {
                    ctx.pool.put(dm);
                }
                None
            };

            // matching children move on whether or not the candidate was kept
            for i in 0..total {
                if self.matching.get(i).unwrap_or(false) {
                    self.currs[i] = self.searchers[i].next(ctx)?;
                }
            }
            self.current_id = self.next_smallest_id();

            if rv.is_some() {
                return Ok(rv);
            }
        }
        Ok(None)
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }
        for (curr, searcher) in self.currs.iter_mut().zip(self.searchers.iter_mut()) {
            let Some(current) = curr.take() else {
                continue;
            };
            if current.index_internal_id >= *id {
                *curr = Some(current);
                continue;
            }
            ctx.pool.put(current);
            *curr = searcher.advance(ctx, id)?;
        }
        self.current_id = self.next_smallest_id();
        self.next(ctx)
    }

    fn close(&mut self) -> Result<()> {
        close_all(self.searchers.iter_mut())
    }

    fn weight(&self) -> f64 {
        self.searchers.iter().map(|s| s.weight()).sum()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        for searcher in self.searchers.iter_mut() {
            searcher.set_query_norm(qnorm);
        }
    }

    fn count(&self) -> u64 {
        self.searchers.iter().map(|s| s.count()).sum()
    }

    fn min(&self) -> usize {
        self.min
    }

    fn document_match_pool_size(&self) -> usize {
        self.currs.len()
            + self
                .searchers
                .iter()
                .map(|s| s.document_match_pool_size())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexReader;
    use crate::search::searcher::test_util::{collect_ids, fixture_reader, ids};
    use crate::search::searcher::{ConjunctionSearcher, MatchNoneSearcher, TermSearcher};

    fn term(reader: &dyn IndexReader, text: &str, field: &str) -> Box<dyn Searcher> {
        Box::new(
            TermSearcher::new(reader, text.as_bytes(), field, 1.0, SearcherOptions::default())
                .unwrap(),
        )
    }

    #[test]
    fn test_or() {
        let reader = fixture_reader();
        let mut searcher = DisjunctionSearcher::new(
            vec![
                term(reader.as_ref(), "marty", "name"),
                term(reader.as_ref(), "dustin", "name"),
            ],
            0,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )
        .unwrap();
        assert_eq!(searcher.count(), 2);
        let hits = collect_ids(&mut searcher);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, "1");
        assert_eq!(hits[1].0, "3");
        // one of two clauses matched each hit
        assert!((hits[0].1 - hits[1].1).abs() < 1e-12);
    }

    #[test]
    fn test_min_should_match() {
        let reader = fixture_reader();
        let build = |min| {
            DisjunctionSearcher::new(
                vec![
                    term(reader.as_ref(), "beer", "desc"),
                    term(reader.as_ref(), "mister", "title"),
                    term(reader.as_ref(), "couchbase", "street"),
                ],
                min,
                SearcherOptions::default(),
                SearcherConfig::default(),
            )
            .unwrap()
        };
        assert_eq!(ids(&mut build(0)), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(ids(&mut build(2)), vec!["1", "2", "3"]);
        assert_eq!(ids(&mut build(3)), vec!["2"]);
    }

    #[test]
    fn test_advance() {
        let reader = fixture_reader();
        let mut searcher = DisjunctionSearcher::new(
            vec![
                term(reader.as_ref(), "marty", "name"),
                term(reader.as_ref(), "mister", "title"),
            ],
            0,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )
        .unwrap();
        let mut ctx = SearchContext::new(searcher.document_match_pool_size());
        let dm = searcher
            .advance(&mut ctx, &IndexInternalId::from("4"))
            .unwrap()
            .unwrap();
        assert_eq!(dm.index_internal_id, IndexInternalId::from("5"));
        ctx.pool.put(dm);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_explanation_coord() {
        let reader = fixture_reader();
        let options = SearcherOptions::default().with_explain(true);
        let mut searcher = DisjunctionSearcher::new(
            vec![
                Box::new(
                    TermSearcher::new(reader.as_ref(), b"marty", "name", 1.0, options).unwrap(),
                ),
                Box::new(
                    TermSearcher::new(reader.as_ref(), b"beer", "desc", 1.0, options).unwrap(),
                ),
                Box::new(MatchNoneSearcher::new()),
            ],
            0,
            options,
            SearcherConfig::default(),
        )
        .unwrap();
        let mut ctx = SearchContext::new(searcher.document_match_pool_size());
        let dm = searcher.next(&mut ctx).unwrap().unwrap();
        let expl = dm.expl.unwrap();
        assert_eq!(expl.message, "product of:");
        assert_eq!(expl.children[1].message, "coord(2/3)");
        assert!((expl.value - dm.score).abs() < 1e-12);
    }

    #[test]
    fn test_too_many_clauses() {
        let reader = fixture_reader();
        let err = DisjunctionSearcher::new(
            vec![
                term(reader.as_ref(), "beer", "desc"),
                term(reader.as_ref(), "water", "desc"),
                term(reader.as_ref(), "apple", "desc"),
            ],
            0,
            SearcherOptions::default(),
            SearcherConfig::with_max_clause_count(2),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "TooManyClauses[maxClauseCount is set to 2]");
    }

    #[test]
    fn test_nested_in_conjunction() {
        let reader = fixture_reader();
        let options = SearcherOptions::default();
        let or: Box<dyn Searcher> = Box::new(
            DisjunctionSearcher::new(
                vec![
                    term(reader.as_ref(), "angst", "desc"),
                    term(reader.as_ref(), "apple", "desc"),
                ],
                0,
                options,
                SearcherConfig::default(),
            )
            .unwrap(),
        );
        let mut searcher =
            ConjunctionSearcher::new(vec![or, term(reader.as_ref(), "mister", "title")], options);
        assert_eq!(ids(&mut searcher), vec!["2", "3"]);
    }
}
