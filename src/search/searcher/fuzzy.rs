use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::index::IndexReader;
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};
use crate::util::LevenshteinMatcher;

/// Largest supported edit distance.
pub const MAX_FUZZINESS: usize = 2;

/// Matches terms within `fuzziness` edits of the query term.
///
/// Only dictionary terms that share the first `prefix` characters of the
/// query term are considered.
#[derive(Debug)]
pub struct FuzzySearcher {
    searcher: MultiTermSearcher,
}

impl FuzzySearcher {
    /// Create a new fuzzy searcher.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: &dyn IndexReader,
        term: &str,
        prefix: usize,
        fuzziness: usize,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        if fuzziness > MAX_FUZZINESS {
            return Err(LancetError::query(format!(
                "fuzziness exceeds max ({MAX_FUZZINESS})"
            )));
        }

        let prefix_term: String = term.chars().take(prefix).collect();
        let candidates = find_fuzzy_candidate_terms(
            index_reader,
            term,
            fuzziness,
            field,
            &prefix_term,
            config,
        )?;
        debug!(
            "fuzzy {term}~{fuzziness} in field {field}: {} candidates",
            candidates.len()
        );

        let searcher =
            MultiTermSearcher::new(index_reader, &candidates, field, boost, options, config)?;
        Ok(FuzzySearcher { searcher })
    }
}

delegate_searcher!(FuzzySearcher, searcher);

fn find_fuzzy_candidate_terms(
    index_reader: &dyn IndexReader,
    term: &str,
    fuzziness: usize,
    field: &str,
    prefix_term: &str,
    config: SearcherConfig,
) -> Result<Vec<Vec<u8>>> {
    let dict = if prefix_term.is_empty() {
        index_reader.field_dict(field)?
    } else {
        index_reader.field_dict_prefix(field, prefix_term.as_bytes())?
    };

    let matcher = LevenshteinMatcher::new(term);
    collect_terms(dict, config, |candidate| {
        std::str::from_utf8(candidate).is_ok_and(|candidate| matcher.is_match(candidate, fuzziness))
    })
}
