use std::fmt;

use log::trace;

use crate::error::Result;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::Searcher;

/// Predicate deciding whether a match is kept.
pub type FilterFunc = Box<dyn FnMut(&mut SearchContext, &DocumentMatch) -> bool + Send>;

/// Passes through the matches of a child searcher that satisfy a predicate.
/// Rejected matches go back to the pool.
pub struct FilteringSearcher {
    child: Box<dyn Searcher>,
    accept: FilterFunc,
}

impl fmt::Debug for FilteringSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringSearcher")
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

impl FilteringSearcher {
    pub fn new(child: Box<dyn Searcher>, accept: FilterFunc) -> Self {
        FilteringSearcher { child, accept }
    }

    fn filter(&mut self, ctx: &mut SearchContext, dm: DocumentMatch) -> Option<DocumentMatch> {
        if (self.accept)(ctx, &dm) {
            Some(dm)
        } else {
            trace!("filtered out {}", dm.index_internal_id);
            ctx.pool.put(dm);
            None
        }
    }
}

impl Searcher for FilteringSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        while let Some(dm) = self.child.next(ctx)? {
            if let Some(dm) = self.filter(ctx, dm) {
                return Ok(Some(dm));
            }
        }
        Ok(None)
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        let Some(dm) = self.child.advance(ctx, id)? else {
            return Ok(None);
        };
        match self.filter(ctx, dm) {
            Some(dm) => Ok(Some(dm)),
            None => self.next(ctx),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.child.close()
    }

    fn weight(&self) -> f64 {
        self.child.weight()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        self.child.set_query_norm(qnorm)
    }

    fn count(&self) -> u64 {
        self.child.count()
    }

    fn min(&self) -> usize {
        self.child.min()
    }

    fn document_match_pool_size(&self) -> usize {
        self.child.document_match_pool_size()
    }
}
