//! Query execution: searcher trees, scoring and hit collection.
//!
//! A query is compiled into a tree of [`Searcher`]s. Leaves read postings
//! or document ids from an [`crate::index::IndexReader`], inner nodes merge
//! their children, and a [`TopNCollector`] drains the root.
//!
//! ```
//! use lancet::config::SearcherOptions;
//! use lancet::index::{Document, Field, UpsideDownIndex};
//! use lancet::search::{TermSearcher, TopNCollector};
//!
//! let index = UpsideDownIndex::in_memory()?;
//! index.update(&Document::new("a").with_field(Field::text("body", "hello world")))?;
//! let reader = index.reader()?;
//!
//! let mut searcher = TermSearcher::new(&reader, b"hello", "body", 1.0, SearcherOptions::default())?;
//! let result = TopNCollector::new(10, 0).collect(&mut searcher, &reader)?;
//! assert_eq!(result.hits[0].id, "a");
//! # Ok::<(), lancet::error::LancetError>(())
//! ```

pub mod collector;
pub mod document_match;
pub mod explanation;
pub mod pool;
pub mod scorer;
pub mod searcher;

pub use collector::{SearchResult, TopNCollector};
pub use document_match::{DocumentMatch, FieldTermLocationMap, Location, TermLocationMap};
pub use explanation::Explanation;
pub use pool::{DocumentMatchPool, SearchContext};
pub use searcher::{
    BooleanSearcher, ConjunctionSearcher, DateRangeSearcher, DisjunctionSearcher, DocIdSearcher,
    FilterFunc, FilteringSearcher, FuzzySearcher, GeoBoundingBoxSearcher,
    GeoPointDistanceSearcher, GeoShapeSearcher, MatchAllSearcher, MatchNoneSearcher,
    MultiTermSearcher, NumericRangeSearcher, PhraseSearcher, RegexpSearcher, Searcher,
    TermPrefixSearcher, TermRangeSearcher, TermSearcher, TimeoutableSearcher,
};
