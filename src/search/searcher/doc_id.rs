use log::debug;

use crate::config::SearcherOptions;
use crate::error::Result;
use crate::index::{DocIdReader, IndexInternalId, IndexReader};
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::ConstantScorer;
use crate::search::searcher::Searcher;

/// Matches a fixed set of documents given by external id.
#[derive(Debug)]
pub struct DocIdSearcher {
    reader: Box<dyn DocIdReader>,
    scorer: ConstantScorer,
    count: u64,
}

impl DocIdSearcher {
    /// Create a new doc id searcher. Unknown ids are ignored.
    pub fn new(
        index_reader: &dyn IndexReader,
        ids: &[String],
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        let reader = index_reader.doc_id_reader_only(ids)?;
        debug!("doc id searcher over {} ids", ids.len());
        Ok(DocIdSearcher {
            reader,
            scorer: ConstantScorer::new(1.0, boost, options),
            count: ids.len() as u64,
        })
    }
}

impl Searcher for DocIdSearcher {
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
