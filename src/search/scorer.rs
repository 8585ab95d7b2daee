//! Relevance scorers.
//!
//! Scorers turn postings (or bare document ids) into scored
//! [`crate::search::DocumentMatch`]es and, in explain mode, build an
//! [`crate::search::Explanation`] node for every operand of the score.

pub mod conjunction;
pub mod constant;
pub mod disjunction;
pub mod term;

pub use conjunction::ConjunctionQueryScorer;
pub use constant::ConstantScorer;
pub use disjunction::DisjunctionQueryScorer;
pub use term::{MAX_SQRT_CACHE, TermQueryScorer};
