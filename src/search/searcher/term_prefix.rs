use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::Result;
use crate::index::IndexReader;
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};

/// Matches every term of a field that starts with a prefix.
#[derive(Debug)]
pub struct TermPrefixSearcher {
    searcher: MultiTermSearcher,
}

impl TermPrefixSearcher {
    pub fn new(
        index_reader: &dyn IndexReader,
        prefix: &str,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        let dict = index_reader.field_dict_prefix(field, prefix.as_bytes())?;
        let terms = collect_terms(dict, config, |_| true)?;
        debug!("prefix {prefix}* in field {field}: {} terms", terms.len());

        let searcher = MultiTermSearcher::new(index_reader, &terms, field, boost, options, config)?;
        Ok(TermPrefixSearcher { searcher })
    }
}

delegate_searcher!(TermPrefixSearcher, searcher);
