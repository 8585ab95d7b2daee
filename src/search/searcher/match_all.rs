use crate::config::SearcherOptions;
use crate::error::Result;
use crate::index::{DocIdReader, IndexInternalId, IndexReader};
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::ConstantScorer;
use crate::search::searcher::Searcher;

/// Matches every live document with a constant score.
#[derive(Debug)]
pub struct MatchAllSearcher {
    reader: Box<dyn DocIdReader>,
    scorer: ConstantScorer,
    count: u64,
}

impl MatchAllSearcher {
    /// Create a new match-all searcher.
    pub fn new(index_reader: &dyn IndexReader, boost: f64, options: SearcherOptions) -> Result<Self> {
        let reader = index_reader.doc_id_reader_all()?;
        let count = index_reader.doc_count()?;
        Ok(MatchAllSearcher {
            reader,
            scorer: ConstantScorer::new(1.0, boost, options),
            count,
        })
    }
}

impl Searcher for MatchAllSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        Ok(self.reader.next()?.map(|id| self.scorer.score(ctx, &id)))
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        Ok(self.reader.advance(id)?.map(|id| self.scorer.score(ctx, &id)))
    }

    fn close(&mut self) -> Result<()> {
        self.reader.close()
    }

    fn weight(&self) -> f64 {
        self.scorer.weight()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        self.scorer.set_query_norm(qnorm);
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn min(&self) -> usize {
        0
    }

    fn document_match_pool_size(&self) -> usize {
        1
    }
}
