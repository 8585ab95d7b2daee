use std::cmp::Ordering;

use log::{debug, trace};

use crate::config::SearcherOptions;
use crate::error::Result;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::ConjunctionQueryScorer;
use crate::search::searcher::Searcher;

/// Combines optional MUST, SHOULD and MUST-NOT clauses.
///
/// Candidates come from `must`, or from `should` when there is no `must`.
/// A candidate that `must_not` also matches is dropped. A `should` match
/// on the same document adds to the score; it only gates the candidate
/// when `should` demands a minimum number of matching clauses.
#[derive(Debug)]
pub struct BooleanSearcher {
    must: Option<Box<dyn Searcher>>,
    should: Option<Box<dyn Searcher>>,
    must_not: Option<Box<dyn Searcher>>,
    query_norm: f64,
    curr_must: Option<DocumentMatch>,
    curr_should: Option<DocumentMatch>,
    curr_must_not: Option<DocumentMatch>,
    current_id: Option<IndexInternalId>,
    scorer: ConjunctionQueryScorer,
    initialized: bool,
}

impl BooleanSearcher {
    /// Create a new boolean searcher.
    pub fn new(
        must: Option<Box<dyn Searcher>>,
        should: Option<Box<dyn Searcher>>,
        must_not: Option<Box<dyn Searcher>>,
        options: SearcherOptions,
    ) -> Self {
        let mut rv = BooleanSearcher {
            must,
            should,
            must_not,
            query_norm: 1.0,
            curr_must: None,
            curr_should: None,
            curr_must_not: None,
            current_id: None,
            scorer: ConjunctionQueryScorer::new(options),
            initialized: false,
        };
        rv.compute_query_norm();
        rv
    }

    pub fn query_norm(&self) -> f64 {
        self.query_norm
    }

    fn compute_query_norm(&mut self) {
        let sum_of_squared_weights = self.weight();
        self.query_norm = if sum_of_squared_weights > 0.0 && sum_of_squared_weights.is_finite() {
            1.0 / sum_of_squared_weights.sqrt()
        } else {
            1.0
        };
        debug!(
            "boolean searcher (must: {}, should: {}, must not: {}), query norm {}",
            self.must.is_some(),
            self.should.is_some(),
            self.must_not.is_some(),
            self.query_norm
        );
        let qnorm = self.query_norm;
        self.set_query_norm(qnorm);
    }

    fn init_searchers(&mut self, ctx: &mut SearchContext) -> Result<()> {
        for (searcher, curr) in [
            (&mut self.must, &mut self.curr_must),
            (&mut self.should, &mut self.curr_should),
            (&mut self.must_not, &mut self.curr_must_not),
        ] {
            if let Some(old) = curr.take() {
                ctx.pool.put(old);
            }
            if let Some(searcher) = searcher {
                *curr = searcher.next(ctx)?;
            }
        }
        self.update_current_id();
        self.initialized = true;
        Ok(())
    }

    fn update_current_id(&mut self) {
        let leader = if self.must.is_some() {
            &self.curr_must
        } else {
            &self.curr_should
        };
        self.current_id = leader.as_ref().map(|dm| dm.index_internal_id.clone());
    }

    /// Step the candidate stream past the current candidate.
    fn advance_next_must(&mut self, ctx: &mut SearchContext) -> Result<()> {
        if let Some(must) = self.must.as_mut() {
            if let Some(old) = self.curr_must.take() {
                ctx.pool.put(old);
            }
            self.curr_must = must.next(ctx)?;
        } else if let Some(should) = self.should.as_mut() {
            if let Some(old) = self.curr_should.take() {
                ctx.pool.put(old);
            }
            self.curr_should = should.next(ctx)?;
        }
        self.update_current_id();
        Ok(())
    }

    /// Score the current candidate, using the `should` match as a bonus
    /// when `with_should` is set.
    fn score_current(&mut self, ctx: &mut SearchContext, with_should: bool) -> Result<DocumentMatch> {
        let mut constituents = Vec::with_capacity(2);
        constituents.extend(self.curr_must.take());
        if with_should {
            constituents.extend(self.curr_should.take());
        }
        let rv = self.scorer.score(ctx, constituents);

        // the consumed matches are gone, move their searchers on
        if let Some(must) = self.must.as_mut() {
            self.curr_must = must.next(ctx)?;
            if with_should {
                if let Some(should) = self.should.as_mut() {
                    self.curr_should = should.next(ctx)?;
                }
            }
        } else if let Some(should) = self.should.as_mut() {
            self.curr_should = should.next(ctx)?;
        }
        self.update_current_id();
        Ok(rv)
    }

    fn should_min(&self) -> usize {
        self.should.as_ref().map_or(0, |s| s.min())
    }
}

impl Searcher for BooleanSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if !self.initialized {
            self.init_searchers(ctx)?;
        }

        while let Some(current_id) = self.current_id.clone() {
            if let Some(curr_must_not) = self.curr_must_not.as_ref() {
                match curr_must_not.index_internal_id.compare(&current_id) {
                    Ordering::Less => {
                        if let Some(old) = self.curr_must_not.take() {
                            ctx.pool.put(old);
                        }
                        if let Some(must_not) = self.must_not.as_mut() {
                            self.curr_must_not = must_not.advance(ctx, &current_id)?;
                        }
                        if self
                            .curr_must_not
                            .as_ref()
                            .is_some_and(|dm| dm.index_internal_id == current_id)
                        {
                            trace!("{current_id} excluded by must not");
                            self.advance_next_must(ctx)?;
                            continue;
                        }
                    }
                    Ordering::Equal => {
                        trace!("{current_id} excluded by must not");
                        self.advance_next_must(ctx)?;
                        continue;
                    }
                    Ordering::Greater => {}
                }
            }

            let should_cmp = self
                .curr_should
                .as_ref()
                .map(|dm| dm.index_internal_id.compare(&current_id));

            match should_cmp {
                Some(Ordering::Less) => {
                    if let Some(old) = self.curr_should.take() {
                        ctx.pool.put(old);
                    }
                    if let Some(should) = self.should.as_mut() {
                        self.curr_should = should.advance(ctx, &current_id)?;
                    }
                    if self
                        .curr_should
                        .as_ref()
                        .is_some_and(|dm| dm.index_internal_id == current_id)
                    {
                        return self.score_current(ctx, true).map(Some);
                    } else if self.should_min() == 0 {
                        return self.score_current(ctx, false).map(Some);
                    }
                }
                Some(Ordering::Equal) => {
                    return self.score_current(ctx, true).map(Some);
                }
                Some(Ordering::Greater) | None => {
                    if self.should.is_none() || self.should_min() == 0 {
                        return self.score_current(ctx, false).map(Some);
                    }
                }
            }

            self.advance_next_must(ctx)?;
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

        for (searcher, curr) in [
            (&mut self.must, &mut self.curr_must),
            (&mut self.should, &mut self.curr_should),
            (&mut self.must_not, &mut self.curr_must_not),
        ] {
            let Some(searcher) = searcher else {
                continue;
            };
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
        self.update_current_id();
        self.next(ctx)
    }

    fn close(&mut self) -> Result<()> {
        let mut rv = Ok(());
        for searcher in [&mut self.must, &mut self.should, &mut self.must_not]
            .into_iter()
            .flatten()
        {
            if let Err(e) = searcher.close() {
                if rv.is_ok() {
                    rv = Err(e);
                }
            }
        }
        rv
    }

    /// Must-not clauses never contribute to scores, so they carry no weight.
    fn weight(&self) -> f64 {
        [&self.must, &self.should]
            .into_iter()
            .flatten()
            .map(|s| s.weight())
            .sum()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        for searcher in [&mut self.must, &mut self.should, &mut self.must_not]
            .into_iter()
            .flatten()
        {
            searcher.set_query_norm(qnorm);
        }
    }

    fn count(&self) -> u64 {
        [&self.must, &self.should]
            .into_iter()
            .flatten()
            .map(|s| s.count())
            .sum()
    }

    fn min(&self) -> usize {
        0
    }

    fn document_match_pool_size(&self) -> usize {
        3 + [&self.must, &self.should, &self.must_not]
            .into_iter()
            .flatten()
            .map(|s| s.document_match_pool_size())
            .sum::<usize>()
    }
}
