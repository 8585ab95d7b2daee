use std::cmp::Ordering;

use log::debug;

use crate::config::SearcherOptions;
use crate::error::Result;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::ConjunctionQueryScorer;
use crate::search::searcher::{Searcher, close_all, compute_query_norm};

/// Matches documents that every child matches.
///
/// Children are ordered by ascending [`Searcher::count`], so the most
/// selective one leads the merge and the larger ones are mostly skipped
/// over with `advance`.
#[derive(Debug)]
pub struct ConjunctionSearcher {
    searchers: Vec<Box<dyn Searcher>>,
    query_norm: f64,
    currs: Vec<Option<DocumentMatch>>,
    max_id_idx: usize,
    max_id: IndexInternalId,
    scorer: ConjunctionQueryScorer,
    initialized: bool,
}

impl ConjunctionSearcher {
    /// Create a new conjunction over `searchers`.
    pub fn new(mut searchers: Vec<Box<dyn Searcher>>, options: SearcherOptions) -> Self {
        searchers.sort_by_key(|s| s.count());
        let query_norm = compute_query_norm(searchers.iter_mut());
        debug!(
            "conjunction over {} searchers, query norm {query_norm}",
            searchers.len()
        );
        let currs = (0..searchers.len()).map(|_| None).collect();
        ConjunctionSearcher {
            searchers,
            query_norm,
            currs,
            max_id_idx: 0,
            max_id: IndexInternalId::default(),
            scorer: ConjunctionQueryScorer::new(options),
            initialized: false,
        }
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
        self.max_id_idx = 0;
        self.initialized = true;
        Ok(())
    }
}

impl Searcher for ConjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        'outer: loop {
            match self.currs.get(self.max_id_idx) {
                Some(Some(leader)) => self.max_id.set(leader.index_internal_id.as_bytes()),
                _ => return Ok(None),
            }

            let mut i = 0;
            while i < self.currs.len() {
                if i == self.max_id_idx {
                    i += 1;
                    continue;
                }
                let Some(curr) = self.currs[i].as_ref() else {
                    return Ok(None);
                };
                match self.max_id.compare(&curr.index_internal_id) {
                    Ordering::Equal => i += 1,
                    Ordering::Less => {
                        self.max_id_idx = i;
                        continue 'outer;
                    }
                    Ordering::Greater => {
                        // behind: skip forward and compare again
                        if let Some(old) = self.currs[i].take() {
                            ctx.pool.put(old);
                        }
                        self.currs[i] = self.searchers[i].advance(ctx, &self.max_id)?;
                    }
                }
            }

            let constituents: Vec<DocumentMatch> =
                self.currs.iter_mut().filter_map(Option::take).collect();
            let rv = self.scorer.score(ctx, constituents);

            for (curr, searcher) in self.currs.iter_mut().zip(self.searchers.iter_mut()) {
                *curr = searcher.next(ctx)?;
            }
            return Ok(Some(rv));
        }
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
        self.searchers.iter().map(|s| s.count()).min().unwrap_or(0)
    }

    fn min(&self) -> usize {
        0
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
