use log::debug;
use regex::Regex;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::Result;
use crate::index::IndexReader;
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};

/// Matches terms that the whole pattern matches.
///
/// The literal prefix of the pattern narrows the dictionary scan. A pattern
/// that is nothing but a literal becomes a single exact term.
#[derive(Debug)]
pub struct RegexpSearcher {
    searcher: MultiTermSearcher,
}

impl RegexpSearcher {
    /// Create a new regexp searcher.
    pub fn new(
        index_reader: &dyn IndexReader,
        pattern: &str,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        let (prefix, complete) = literal_prefix(pattern);

        let candidates = if complete {
            vec![prefix.into_bytes()]
        } else {
            let dict = if prefix.is_empty() {
                index_reader.field_dict(field)?
            } else {
                index_reader.field_dict_prefix(field, prefix.as_bytes())?
            };
            collect_terms(dict, config, |term| {
                std::str::from_utf8(term).is_ok_and(|term| regex.is_match(term))
            })?
        };
        debug!(
            "regexp /{pattern}/ in field {field}: {} candidates",
            candidates.len()
        );

        let searcher =
            MultiTermSearcher::new(index_reader, &candidates, field, boost, options, config)?;
        Ok(RegexpSearcher { searcher })
    }
}

delegate_searcher!(RegexpSearcher, searcher);

/// The literal text every match of `pattern` starts with, and whether that
/// text is the entire pattern.
pub fn literal_prefix(pattern: &str) -> (String, bool) {
    let mut prefix = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' | '?' | '{' | '+' => {
                // the quantifier applies to the last literal character
                prefix.pop();
                return (prefix, false);
            }
            // escaped punctuation is literal; classes like \d end the prefix
            '\\' => match chars.next() {
                Some(escaped) if escaped.is_ascii_punctuation() => prefix.push(escaped),
                _ => return (prefix, false),
            },
            '.' | '(' | ')' | '|' | '[' | ']' | '}' | '^' | '$' => {
                return (prefix, false);
            }
            _ => prefix.push(c),
        }
    }
    (prefix, true)
}
