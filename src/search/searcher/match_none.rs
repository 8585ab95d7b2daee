use crate::error::Result;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::Searcher;

/// Matches nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchNoneSearcher;

impl MatchNoneSearcher {
    pub fn new() -> Self {
        MatchNoneSearcher
    }
}

impl Searcher for MatchNoneSearcher {
    fn next(&mut self, _ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn advance(
        &mut self,
        _ctx: &mut SearchContext,
        _id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn weight(&self) -> f64 {
        0.0
    }

    fn set_query_norm(&mut self, _qnorm: f64) {}

    fn count(&self) -> u64 {
        0
    }

    fn min(&self) -> usize {
        0
    }

    fn document_match_pool_size(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_none() {
        let mut searcher = MatchNoneSearcher::new();
        let mut ctx = SearchContext::new(0);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
        assert!(
            searcher
                .advance(&mut ctx, &IndexInternalId::from("1"))
                .unwrap()
                .is_none()
        );
        assert_eq!(searcher.count(), 0);
        assert_eq!(ctx.pool.allocations(), 0);
    }
}
