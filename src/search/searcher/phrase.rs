use log::{debug, trace};

use crate::config::SearcherOptions;
use crate::error::{LancetError, Result};
use crate::index::{IndexInternalId, IndexReader};
use crate::search::document_match::{
    DocumentMatch, FieldTermLocationMap, TermLocationMap, add_location, merge_term_location_maps,
};
use crate::search::pool::SearchContext;
use crate::search::searcher::{ConjunctionSearcher, Searcher, TermSearcher};

/// Matches documents where the terms occur at consecutive positions.
///
/// An empty string in `terms` is a gap: any token may stand at that
/// position. Candidates come from a conjunction of the non-empty terms and
/// are then checked against their term vectors.
#[derive(Debug)]
pub struct PhraseSearcher {
    terms: Vec<String>,
    must: ConjunctionSearcher,
}

impl PhraseSearcher {
    pub fn new<S: AsRef<str>>(
        index_reader: &dyn IndexReader,
        terms: &[S],
        field: &str,
        options: SearcherOptions,
    ) -> Result<Self> {
        let terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_string()).collect();
        if terms.iter().all(String::is_empty) {
            return Err(LancetError::query("phrase must contain at least one term"));
        }

        let term_options = options.with_term_vectors(true);
        let mut searchers: Vec<Box<dyn Searcher>> = Vec::new();
        for term in terms.iter().filter(|t| !t.is_empty()) {
            searchers.push(Box::new(TermSearcher::new(
                index_reader,
                term.as_bytes(),
                field,
                1.0,
                term_options,
            )?));
        }
        debug!("phrase {terms:?} in field {field}");

        Ok(PhraseSearcher {
            terms,
            must: ConjunctionSearcher::new(searchers, options),
        })
    }

    /// Keep `dm` if the phrase occurs in it, replacing its locations with
    /// those of the phrase occurrences. Otherwise it goes back to the pool.
    fn check_phrase(&self, ctx: &mut SearchContext, mut dm: DocumentMatch) -> Option<DocumentMatch> {
        let Some((first_idx, first_term)) = self
            .terms
            .iter()
            .enumerate()
            .find(|(_, term)| !term.is_empty())
        else {
            ctx.pool.put(dm);
            return None;
        };

        let mut rv = FieldTermLocationMap::new();
        let mut freq = 0u64;
        for (field, term_locations) in &dm.locations {
            let Some(locations) = term_locations.get(first_term) else {
                continue;
            };
            let mut field_rv = TermLocationMap::new();
            'outer: for location in locations {
                let mut candidate = TermLocationMap::new();
                for (i, term) in self.terms.iter().enumerate().skip(first_idx) {
                    if term.is_empty() {
                        continue;
                    }
                    let want = location.pos + (i - first_idx) as u64;
                    let next = term_locations.get(term).and_then(|next_locations| {
                        next_locations
                            .iter()
                            .find(|next| next.pos == want && next.same_array_element(location))
                    });
                    match next {
                        Some(next) => add_location(&mut candidate, term, next.clone()),
                        None => continue 'outer,
                    }
                }
                freq += 1;
                merge_term_location_maps(&mut field_rv, candidate);
            }
            if !field_rv.is_empty() {
                rv.insert(field.clone(), field_rv);
            }
        }

        if freq > 0 {
            dm.locations = rv;
            Some(dm)
        } else {
            trace!("phrase rejected {}", dm.index_internal_id);
            ctx.pool.put(dm);
            None
        }
    }

    fn next_phrase_match(
        &mut self,
        ctx: &mut SearchContext,
        mut candidate: Option<DocumentMatch>,
    ) -> Result<Option<DocumentMatch>> {
        while let Some(dm) = candidate {
            if let Some(dm) = self.check_phrase(ctx, dm) {
                return Ok(Some(dm));
            }
            candidate = self.must.next(ctx)?;
        }
        Ok(None)
    }
}

impl Searcher for PhraseSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        let candidate = self.must.next(ctx)?;
        self.next_phrase_match(ctx, candidate)
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        let candidate = self.must.advance(ctx, id)?;
        self.next_phrase_match(ctx, candidate)
    }

    fn close(&mut self) -> Result<()> {
        self.must.close()
    }

    fn weight(&self) -> f64 {
        self.must.weight()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        self.must.set_query_norm(qnorm)
    }

    fn count(&self) -> u64 {
        self.must.count()
    }

    fn min(&self) -> usize {
        0
    }

    fn document_match_pool_size(&self) -> usize {
        self.must.document_match_pool_size() + 1
    }
}
