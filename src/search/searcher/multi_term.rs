use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::index::{FieldDict, IndexReader};
use crate::search::searcher::{DisjunctionSearcher, Searcher, TermSearcher, close_all, delegate_searcher};

/// A plain OR over one term searcher per candidate term.
///
/// This is what the term-expansion searchers (fuzzy, regexp, prefix and
/// the ranges) compile down to.
#[derive(Debug)]
pub struct MultiTermSearcher {
    searcher: DisjunctionSearcher,
}

impl MultiTermSearcher {
    /// Create a new multi-term searcher.
    pub fn new(
        index_reader: &dyn IndexReader,
        terms: &[Vec<u8>],
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        if config.too_many_clauses(terms.len()) {
            return Err(LancetError::too_many_clauses(config.max_clause_count));
        }
        debug!("expanding {} terms in field {field}", terms.len());

        let mut searchers: Vec<Box<dyn Searcher>> = Vec::with_capacity(terms.len());
        for term in terms {
            match TermSearcher::new(index_reader, term, field, boost, options) {
                Ok(searcher) => searchers.push(Box::new(searcher)),
                Err(e) => {
                    let _ = close_all(searchers.iter_mut());
                    return Err(e);
                }
            }
        }

        let searcher = DisjunctionSearcher::new(searchers, 0, options, config)?;
        Ok(MultiTermSearcher { searcher })
    }
}

delegate_searcher!(MultiTermSearcher, searcher);

/// Drain a field dictionary, keeping the terms `accept` approves. Fails as
/// soon as the kept terms exceed the clause ceiling.
pub(crate) fn collect_terms<F>(
    mut dict: Box<dyn FieldDict>,
    config: SearcherConfig,
    mut accept: F,
) -> Result<Vec<Vec<u8>>>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut rv = Vec::new();
    let result = loop {
        let entry = match dict.next() {
            Ok(Some(entry)) => entry,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        if accept(&entry.term) {
            rv.push(entry.term);
            if config.too_many_clauses(rv.len()) {
                break Err(LancetError::too_many_clauses(config.max_clause_count));
            }
        }
    };
    dict.close()?;
    result.map(|_| rv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::searcher::test_util::{fixture_reader, ids};

    fn terms(words: &[&str]) -> Vec<Vec<u8>> {
        words.iter().map(|w| w.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_multi_term() {
        let reader = fixture_reader();
        let mut searcher = MultiTermSearcher::new(
            reader.as_ref(),
            &terms(&["water", "angst", "nothing"]),
            "desc",
            1.0,
            SearcherOptions::default(),
            SearcherConfig::default(),
        )
        .unwrap();
        assert_eq!(searcher.count(), 2);
        assert_eq!(ids(&mut searcher), vec!["2", "5"]);
    }

    #[test]
    fn test_multi_term_clause_limit() {
        let reader = fixture_reader();
        let err = MultiTermSearcher::new(
            reader.as_ref(),
            &terms(&["water", "angst", "beer"]),
            "desc",
            1.0,
            SearcherOptions::default(),
            SearcherConfig::with_max_clause_count(2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LancetError::TooManyClauses {
                max_clause_count: 2
            }
        ));
    }

    #[test]
    fn test_collect_terms() {
        let reader = fixture_reader();
        let dict = reader.field_dict("desc").unwrap();
        let collected = collect_terms(dict, SearcherConfig::default(), |t| t.starts_with(b"c")).unwrap();
        assert_eq!(collected, terms(&["column", "couch"]));

        let dict = reader.field_dict("desc").unwrap();
        let err = collect_terms(dict, SearcherConfig::with_max_clause_count(1), |_| true).unwrap_err();
        assert!(matches!(err, LancetError::TooManyClauses { .. }));
    }
}
