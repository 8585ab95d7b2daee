//! Document match recycling and per-query search state.

use log::trace;

use crate::search::document_match::DocumentMatch;

/// A pool of reusable [`DocumentMatch`] values.
///
/// Whoever holds a match owns it. A component that replaces a match it
/// holds must `put` the old one back. When the pool runs dry it hands
/// out fresh matches and counts how often that happened.
#[derive(Debug, Default)]
pub struct DocumentMatchPool {
    avail: Vec<DocumentMatch>,
    too_small: u64,
}

impl DocumentMatchPool {
    /// Create a pool with `size` matches preallocated.
    pub fn new(size: usize) -> Self {
        DocumentMatchPool {
            avail: (0..size).map(|_| DocumentMatch::default()).collect(),
            too_small: 0,
        }
    }

    /// Take a cleared match.
    pub fn get(&mut self) -> DocumentMatch {
        match self.avail.pop() {
            Some(dm) => dm,
            None => {
                self.too_small += 1;
                trace!("document match pool empty, allocating");
                DocumentMatch::default()
            }
        }
    }

    /// Return a match to the pool. It is reset first.
    pub fn put(&mut self, mut dm: DocumentMatch) {
        dm.reset();
        self.avail.push(dm);
    }

    /// Number of matches ready to hand out.
    pub fn available(&self) -> usize {
        self.avail.len()
    }

    /// How many times `get` had to allocate.
    pub fn allocations(&self) -> u64 {
        self.too_small
    }
}

/// State shared by every searcher of one query execution.
#[derive(Debug, Default)]
pub struct SearchContext {
    pub pool: DocumentMatchPool,

    /// Optional score floor set by the caller. Term searchers skip postings
    /// whose score would fall below it.
    pub low_score_filter: f64,

    /// Postings skipped because of `low_score_filter`. They still count
    /// towards total hits.
    pub low_score_num_matches: u64,
}

impl SearchContext {
    /// A context whose pool holds `pool_size` matches.
    pub fn new(pool_size: usize) -> Self {
        SearchContext {
            pool: DocumentMatchPool::new(pool_size),
            low_score_filter: 0.0,
            low_score_num_matches: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexInternalId;

    #[test]
    fn test_get_put() {
        let mut pool = DocumentMatchPool::new(1);
        let mut dm = pool.get();
        assert_eq!(pool.available(), 0);
        dm.index_internal_id = IndexInternalId::from("x");
        dm.score = 1.5;

        pool.put(dm);
        assert_eq!(pool.available(), 1);
        let dm = pool.get();
        assert!(dm.index_internal_id.is_empty());
        assert_eq!(dm.score, 0.0);
        assert_eq!(pool.allocations(), 0);
    }

    #[test]
    fn test_grows_when_too_small() {
        let mut pool = DocumentMatchPool::new(0);
        let a = pool.get();
        let b = pool.get();
        assert_eq!(pool.allocations(), 2);
        pool.put(a);
        pool.put(b);
        assert_eq!(pool.available(), 2);
    }
}
