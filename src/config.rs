//! Configuration values threaded through searcher and index construction.
//!
//! Nothing in this crate reads ambient global state: clause ceilings, explain
//! mode and analyzer choice all travel as explicit values. Every config type
//! can be loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-query options shared by every searcher in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherOptions {
    /// Build an explanation tree alongside every score.
    pub explain: bool,

    /// Collect field/term/location maps from term vectors.
    pub include_term_vectors: bool,
}

impl SearcherOptions {
    /// Options with explanations turned on.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Options with term vector collection turned on.
    pub fn with_term_vectors(mut self, include: bool) -> Self {
        self.include_term_vectors = include;
        self
    }
}

/// Limits applied while building searcher trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    /// Maximum number of child clauses a disjunction (or a term expansion)
    /// may produce. Zero means unbounded.
    pub max_clause_count: usize,
}

impl SearcherConfig {
    /// Create a config with the given clause ceiling.
    pub fn with_max_clause_count(max_clause_count: usize) -> Self {
        SearcherConfig { max_clause_count }
    }

    /// Returns true if `count` clauses would exceed the ceiling.
    pub fn too_many_clauses(&self, count: usize) -> bool {
        self.max_clause_count > 0 && count > self.max_clause_count
    }
}

/// Tokenizer used for text fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Every match of `token_pattern`.
    #[default]
    Regex,
    /// Unicode word boundaries.
    UnicodeWord,
}

/// Settings for the in-memory index writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub tokenizer: TokenizerKind,

    /// Token pattern used by the regex tokenizer.
    pub token_pattern: String,

    /// Whether text fields record term vectors unless a field says otherwise.
    pub store_term_vectors: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            tokenizer: TokenizerKind::Regex,
            token_pattern: r"\w+".to_string(),
            store_term_vectors: true,
        }
    }
}

/// Load any config type from a JSON string.
pub fn from_json_str<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Load any config type from a JSON file.
pub fn from_json_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T> {
    let data = std::fs::read_to_string(path)?;
    from_json_str(&data)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearcherConfig::default();
        assert_eq!(config.max_clause_count, 0);
        assert!(!config.too_many_clauses(1_000_000));

        let options = SearcherOptions::default();
        assert!(!options.explain);
        assert!(!options.include_term_vectors);
    }

    #[test]
    fn test_clause_ceiling() {
        let config = SearcherConfig::with_max_clause_count(2);
        assert!(!config.too_many_clauses(2));
        assert!(config.too_many_clauses(3));
    }

    #[test]
    fn test_partial_json() {
        let options: SearcherOptions = from_json_str(r#"{"explain": true}"#).unwrap();
        assert!(options.explain);
        assert!(!options.include_term_vectors);

        let index: IndexConfig = from_json_str(r#"{"store_term_vectors": false}"#).unwrap();
        assert_eq!(index.token_pattern, r"\w+");
        assert_eq!(index.tokenizer, TokenizerKind::Regex);
        assert!(!index.store_term_vectors);

        let index: IndexConfig = from_json_str(r#"{"tokenizer": "unicode_word"}"#).unwrap();
        assert_eq!(index.tokenizer, TokenizerKind::UnicodeWord);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_clause_count": 16}}"#).unwrap();

        let config: SearcherConfig = from_json_file(file.path()).unwrap();
        assert_eq!(config.max_clause_count, 16);
    }
}
