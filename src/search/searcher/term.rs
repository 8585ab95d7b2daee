use crate::config::SearcherOptions;
use crate::error::Result;
use crate::index::reader::{FreqNormFilter, TermFieldDoc, TermFieldReader};
use crate::index::{IndexInternalId, IndexReader};
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::scorer::TermQueryScorer;
use crate::search::searcher::Searcher;

/// Iterates the postings of one term in one field, scoring each.
#[derive(Debug)]
pub struct TermSearcher {
    reader: Box<dyn TermFieldReader>,
    scorer: TermQueryScorer,
    tfd: Option<TermFieldDoc>,
}

impl TermSearcher {
    /// Create a new term searcher.
    pub fn new(
        index_reader: &dyn IndexReader,
        term: &[u8],
        field: &str,
        boost: f64,
        options: SearcherOptions,
    ) -> Result<Self> {
        let reader = index_reader.term_field_reader(
            term,
            field,
            true,
            true,
            options.include_term_vectors,
        )?;
        let count = index_reader.doc_count()?;
        let scorer = TermQueryScorer::new(term, field, boost, count, reader.count(), options);
        Ok(TermSearcher {
            reader,
            scorer,
            tfd: None,
        })
    }

    fn reusable(&mut self) -> Option<TermFieldDoc> {
        self.tfd.take().map(|mut tfd| {
            tfd.reset();
            tfd
        })
    }

    fn score(&mut self, ctx: &mut SearchContext, term_match: Option<TermFieldDoc>) -> Option<DocumentMatch> {
        let term_match = term_match?;
        let dm = self.scorer.score(ctx, &term_match);
        self.tfd = Some(term_match);
        Some(dm)
    }
}

impl Searcher for TermSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        let reuse = self.reusable();

        let term_match = if ctx.low_score_filter > 0.0 {
            let threshold = ctx.low_score_filter;
            let scorer = &self.scorer;
            let mut skipped = 0u64;
            let mut keep = |freq: u64, norm: f64| {
                if scorer.score_freq_norm(freq, norm) < threshold {
                    skipped += 1;
                    false
                } else {
                    true
                }
            };
            let filter: FreqNormFilter<'_> = &mut keep;
            let rv = self.reader.next(reuse, Some(filter));
            ctx.low_score_num_matches += skipped;
            rv?
        } else {
            self.reader.next(reuse, None)?
        };

        Ok(self.score(ctx, term_match))
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        let reuse = self.reusable();
        let term_match = self.reader.advance(id, reuse)?;
        Ok(self.score(ctx, term_match))
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
        self.reader.count()
    }

    fn min(&self) -> usize {
        0
    }

    fn document_match_pool_size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::searcher::test_util::{collect_ids, fixture_reader};

    #[test]
    fn test_term_searcher() {
        let reader = fixture_reader();
        let mut searcher =
            TermSearcher::new(reader.as_ref(), b"beer", "desc", 1.0, SearcherOptions::default())
                .unwrap();
        assert_eq!(searcher.count(), 4);

        let hits = collect_ids(&mut searcher);
        let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        // idf = 1 + ln(5 / 5), so scores are tf * norm
        let (_, score_one) = hits[0];
        assert!((score_one - 2.0 * (1.0 / 4f64.sqrt())).abs() < 1e-6);
        searcher.close().unwrap();
    }

    #[test]
    fn test_term_searcher_advance() {
        let reader = fixture_reader();
        let mut searcher =
            TermSearcher::new(reader.as_ref(), b"mister", "title", 1.0, SearcherOptions::default())
                .unwrap();
        let mut ctx = SearchContext::new(1);
        let dm = searcher
            .advance(&mut ctx, &IndexInternalId::from("3"))
            .unwrap()
            .unwrap();
        assert_eq!(dm.index_internal_id, IndexInternalId::from("3"));
        ctx.pool.put(dm);

        let dm = searcher.next(&mut ctx).unwrap().unwrap();
        assert_eq!(dm.index_internal_id, IndexInternalId::from("5"));
        ctx.pool.put(dm);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_missing_term() {
        let reader = fixture_reader();
        let mut searcher =
            TermSearcher::new(reader.as_ref(), b"wine", "desc", 1.0, SearcherOptions::default())
                .unwrap();
        assert_eq!(searcher.count(), 0);
        assert!(collect_ids(&mut searcher).is_empty());
    }

    #[test]
    fn test_low_score_filter() {
        let reader = fixture_reader();
        let mut searcher =
            TermSearcher::new(reader.as_ref(), b"beer", "desc", 1.0, SearcherOptions::default())
                .unwrap();
        let mut ctx = SearchContext::new(1);
        // only doc 1 (tf 2 * norm 0.5) and doc 4 (sqrt(65) * 1/sqrt(65)) reach 1.0
        ctx.low_score_filter = 0.9;

        let mut ids = Vec::new();
        while let Some(dm) = searcher.next(&mut ctx).unwrap() {
            ids.push(dm.index_internal_id.to_string());
            ctx.pool.put(dm);
        }
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(ctx.low_score_num_matches, 2);
    }
}
