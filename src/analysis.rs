//! Text analysis used when building an index.
//!
//! Searchers never analyze text themselves; they receive already analyzed
//! terms. The analyzers here exist so the in-memory index and the CLI can
//! turn field values into positioned tokens.

pub mod analyzer;
pub mod token;
pub mod tokenizer;
