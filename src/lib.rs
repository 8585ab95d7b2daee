//! # Lancet
//!
//! Composable full-text searchers, relevance scoring and geo shape
//! predicates over an upside-down inverted index.
//!
//! ## Features
//!
//! - Pull-based searcher trees: term, conjunction, disjunction with
//!   min-should-match, boolean, phrase and match-all/none
//! - Term expansion: fuzzy, regexp, prefix, term range, numeric and date
//!   ranges, all bounded by a configurable clause ceiling
//! - TF-IDF scoring with query normalization and explanation trees
//! - Geo point bounding-box and distance search over morton-hashed terms
//! - GeoJSON shapes with `intersects`, `contains` and `within` relations
//! - A snapshot-isolated in-memory key-value store and index for fixtures
//!   and the `lancet` command line tool

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod index;
pub mod numeric;
pub mod search;
pub mod storage;
pub mod util;

pub mod prelude {
    pub use crate::config::{IndexConfig, SearcherConfig, SearcherOptions};
    pub use crate::error::{LancetError, Result};
    pub use crate::geo::GeoShape;
    pub use crate::index::{Document, Field, IndexReader, UpsideDownIndex};
    pub use crate::search::{DocumentMatch, SearchContext, SearchResult, Searcher, TopNCollector};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
