//! Top-N hit collection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::index::IndexReader;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;
use crate::search::searcher::Searcher;

/// Hits of one search, best first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    pub hits: Vec<DocumentMatch>,
    pub total_hits: u64,
    pub max_score: f64,
    pub took: Duration,
}

// Heap entry ordered so that the worst hit is the greatest.
struct Ranked(DocumentMatch);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .score
            .total_cmp(&self.0.score)
            .then_with(|| self.0.index_internal_id.cmp(&other.0.index_internal_id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Keeps the `size` best hits after skipping the first `skip`.
///
/// Hits are ranked by descending score, ties by ascending internal id.
#[derive(Debug, Clone, Copy)]
pub struct TopNCollector {
    size: usize,
    skip: usize,
}

impl TopNCollector {
    pub fn new(size: usize, skip: usize) -> Self {
        TopNCollector { size, skip }
    }

    /// Drain `searcher` and return the top hits with their external ids.
    pub fn collect(
        &self,
        searcher: &mut dyn Searcher,
        index_reader: &dyn IndexReader,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        let keep = self.size + self.skip;
        let mut ctx = SearchContext::new(searcher.document_match_pool_size() + keep);

        let mut heap = BinaryHeap::with_capacity(keep + 1);
        let mut total_hits = 0u64;
        let mut max_score = 0.0f64;
        while let Some(mut dm) = searcher.next(&mut ctx)? {
            total_hits += 1;
            dm.hit_number = total_hits;
            if dm.score > max_score {
                max_score = dm.score;
            }
            if keep == 0 {
                ctx.pool.put(dm);
                continue;
            }
            heap.push(Ranked(dm));
            if heap.len() > keep {
                if let Some(Ranked(worst)) = heap.pop() {
                    ctx.pool.put(worst);
                }
            }
        }
        total_hits += ctx.low_score_num_matches;

        let mut hits = Vec::with_capacity(self.size);
        for Ranked(mut dm) in heap.into_sorted_vec().into_iter().skip(self.skip) {
            dm.id = index_reader.external_id(&dm.index_internal_id)?;
            hits.push(dm);
        }

        let took = start.elapsed();
        debug!(
            "collected {} of {total_hits} hits in {took:?}, pool allocations {}",
            hits.len(),
            ctx.pool.allocations()
        );
        Ok(SearchResult {
            hits,
            total_hits,
            max_score,
            took,
        })
    }
}
