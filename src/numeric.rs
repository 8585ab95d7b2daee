//! Sortable numeric term encodings.
//!
//! Numbers are indexed as prefix-coded byte strings: a shift byte followed by
//! the value's sortable bits in 7-bit groups. Lexicographic order of the
//! encoded terms matches numeric order, which is what lets range searchers
//! enumerate term ranges instead of scanning.

pub mod bits;
pub mod prefix_coded;

pub use bits::{deinterleave, float64_to_int64, int64_to_float64, interleave};
pub use prefix_coded::{PrefixCoded, SHIFT_START_INT64, valid_prefix_coded_term};
