use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::Result;
use crate::index::IndexReader;
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};

/// Matches the terms of a field that sort between two byte strings.
///
/// A missing bound is open. The minimum is inclusive and the maximum
/// exclusive unless stated otherwise.
#[derive(Debug)]
pub struct TermRangeSearcher {
    searcher: MultiTermSearcher,
}

impl TermRangeSearcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: &dyn IndexReader,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        inclusive_min: Option<bool>,
        inclusive_max: Option<bool>,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        let inclusive_min = inclusive_min.unwrap_or(true);
        let inclusive_max = inclusive_max.unwrap_or(false);
        let min = min.unwrap_or_default();
        let max = max.unwrap_or_default();

        let dict = index_reader.field_dict_range(field, min, max)?;
        let terms = collect_terms(dict, config, |term| {
            if !inclusive_min && !min.is_empty() && term == min {
                return false;
            }
            if !inclusive_max && !max.is_empty() && term == max {
                return false;
            }
            true
        })?;
        debug!("term range in field {field}: {} terms", terms.len());

        let searcher = MultiTermSearcher::new(index_reader, &terms, field, boost, options, config)?;
        Ok(TermRangeSearcher { searcher })
    }
}

delegate_searcher!(TermRangeSearcher, searcher);
