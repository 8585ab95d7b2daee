//! Searchers: pull-based iterators over scored document matches.
//!
//! A query executes as a tree of searchers. Leaves wrap posting-list or
//! document-id readers, inner nodes merge their children's streams. Every
//! searcher yields matches in strictly ascending internal-id order and
//! supports skipping forward with [`Searcher::advance`].
//!
//! Matches are drawn from the [`SearchContext`] pool. Ownership moves with
//! the value: a searcher that discards or replaces a match puts it back.

pub mod boolean;
pub mod conjunction;
pub mod date_range;
pub mod disjunction;
pub mod doc_id;
pub mod filtering;
pub mod fuzzy;
pub mod geo_bounding_box;
pub mod geo_point_distance;
pub mod geo_shape;
pub mod match_all;
pub mod match_none;
pub mod multi_term;
pub mod numeric_range;
pub mod phrase;
pub mod regexp;
pub mod term;
pub mod term_prefix;
pub mod term_range;
pub mod timeout;

use std::fmt::Debug;

use crate::error::Result;
use crate::index::IndexInternalId;
use crate::search::document_match::DocumentMatch;
use crate::search::pool::SearchContext;

pub use boolean::BooleanSearcher;
pub use conjunction::ConjunctionSearcher;
pub use date_range::{DateRangeSearcher, parse_date_bound};
pub use disjunction::DisjunctionSearcher;
pub use doc_id::DocIdSearcher;
pub use filtering::{FilterFunc, FilteringSearcher};
pub use fuzzy::{FuzzySearcher, MAX_FUZZINESS};
pub use geo_bounding_box::GeoBoundingBoxSearcher;
pub use geo_point_distance::GeoPointDistanceSearcher;
pub use geo_shape::GeoShapeSearcher;
pub use match_all::MatchAllSearcher;
pub use match_none::MatchNoneSearcher;
pub use multi_term::MultiTermSearcher;
pub use numeric_range::{NumericRangeSearcher, TermRange, increment_bytes, split_int64_range};
pub use phrase::PhraseSearcher;
pub use regexp::{RegexpSearcher, literal_prefix};
pub use term::TermSearcher;
pub use term_prefix::TermPrefixSearcher;
pub use term_range::TermRangeSearcher;
pub use timeout::TimeoutableSearcher;

/// A node of a searcher tree.
pub trait Searcher: Send + Debug {
    /// The next match in id order, or `None` once exhausted.
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>>;

    /// The first match whose id is greater than or equal to `id`.
    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>>;

    /// Release the underlying readers.
    fn close(&mut self) -> Result<()>;

    /// Sum of squared weights of the scoring leaves below this node.
    fn weight(&self) -> f64;

    /// Broadcast the query norm to every scoring leaf.
    fn set_query_norm(&mut self, qnorm: f64);

    /// Estimated number of matches. Used to order children.
    fn count(&self) -> u64;

    /// Minimum number of children that must match. Zero for most searchers.
    fn min(&self) -> usize;

    /// Number of matches this subtree may hold at once.
    fn document_match_pool_size(&self) -> usize;
}

impl Searcher for Box<dyn Searcher> {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        (**self).next(ctx)
    }

    fn advance(
        &mut self,
        ctx: &mut SearchContext,
        id: &IndexInternalId,
    ) -> Result<Option<DocumentMatch>> {
        (**self).advance(ctx, id)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn set_query_norm(&mut self, qnorm: f64) {
        (**self).set_query_norm(qnorm)
    }

    fn count(&self) -> u64 {
        (**self).count()
    }

    fn min(&self) -> usize {
        (**self).min()
    }

    fn document_match_pool_size(&self) -> usize {
        (**self).document_match_pool_size()
    }
}

/// Compute `1 / sqrt(sum of weights)` over `searchers` and hand it to each
/// of them. A sum that is zero or not finite leaves scores unnormalized.
pub(crate) fn compute_query_norm<'a, I>(searchers: I) -> f64
where
    I: IntoIterator<Item = &'a mut Box<dyn Searcher>>,
{
    let mut searchers: Vec<&mut Box<dyn Searcher>> = searchers.into_iter().collect();
    let sum_of_squared_weights: f64 = searchers.iter().map(|s| s.weight()).sum();
    let query_norm = if sum_of_squared_weights > 0.0 && sum_of_squared_weights.is_finite() {
        1.0 / sum_of_squared_weights.sqrt()
    } else {
        1.0
    };
    for searcher in searchers.iter_mut() {
        searcher.set_query_norm(query_norm);
    }
    query_norm
}

/// Close every searcher, keeping the first error.
pub(crate) fn close_all<'a, I>(searchers: I) -> Result<()>
where
    I: IntoIterator<Item = &'a mut Box<dyn Searcher>>,
{
    let mut rv = Ok(());
    for searcher in searchers {
        if let Err(e) = searcher.close() {
            if rv.is_ok() {
                rv = Err(e);
            }
        }
    }
    rv
}

/// Implement [`Searcher`] for a wrapper by forwarding to one of its fields.
macro_rules! delegate_searcher {
    ($ty:ty, $field:ident) => {
        impl $crate::search::searcher::Searcher for $ty {
            fn next(
                &mut self,
                ctx: &mut $crate::search::pool::SearchContext,
            ) -> $crate::error::Result<Option<$crate::search::document_match::DocumentMatch>> {
                $crate::search::searcher::Searcher::next(&mut self.$field, ctx)
            }

            fn advance(
                &mut self,
                ctx: &mut $crate::search::pool::SearchContext,
                id: &$crate::index::IndexInternalId,
            ) -> $crate::error::Result<Option<$crate::search::document_match::DocumentMatch>> {
                $crate::search::searcher::Searcher::advance(&mut self.$field, ctx, id)
            }

            fn close(&mut self) -> $crate::error::Result<()> {
                $crate::search::searcher::Searcher::close(&mut self.$field)
            }

            fn weight(&self) -> f64 {
                $crate::search::searcher::Searcher::weight(&self.$field)
            }

            fn set_query_norm(&mut self, qnorm: f64) {
                $crate::search::searcher::Searcher::set_query_norm(&mut self.$field, qnorm)
            }

            fn count(&self) -> u64 {
                $crate::search::searcher::Searcher::count(&self.$field)
            }

            fn min(&self) -> usize {
                0
            }

            fn document_match_pool_size(&self) -> usize {
                $crate::search::searcher::Searcher::document_match_pool_size(&self.$field)
            }
        }
    };
}

pub(crate) use delegate_searcher;
