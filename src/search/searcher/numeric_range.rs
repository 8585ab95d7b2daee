//! Numeric range expansion over prefix-coded terms.
//!
//! A `[min, max]` interval over sortable int64 values is split into the
//! smallest set of prefix-coded term ranges: full-precision ranges at the
//! ragged ends, coarser shifts towards the middle. Each range is enumerated
//! into literal terms by big-endian byte increment; the clause ceiling
//! applies to that enumeration, before the dictionary is consulted.

use ahash::AHashSet;
use log::debug;

use crate::config::{SearcherConfig, SearcherOptions};
use crate::error::{LancetError, Result};
use crate::index::IndexReader;
use crate::numeric::{PrefixCoded, float64_to_int64};
use crate::search::searcher::multi_term::collect_terms;
use crate::search::searcher::{MultiTermSearcher, delegate_searcher};

/// Shift step the index uses for numeric and date terms.
pub const NUMERIC_PRECISION_STEP: u32 = crate::index::upside_down::NUMERIC_PRECISION_STEP;

/// An inclusive range of terms that share one prefix-coding shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRange {
    pub start_term: Vec<u8>,
    pub end_term: Vec<u8>,
}

impl TermRange {
    fn new(min_bound: i64, max_bound: i64, shift: u32) -> Result<Self> {
        let max_bound = max_bound | 1i64.wrapping_shl(shift).wrapping_sub(1);
        Ok(TermRange {
            start_term: PrefixCoded::new_int64(min_bound, shift)?.into_bytes(),
            end_term: PrefixCoded::new_int64(max_bound, shift)?.into_bytes(),
        })
    }

    /// Every byte string from `start_term` to `end_term`, in order.
    pub fn enumerate(&self) -> Vec<Vec<u8>> {
        let mut rv = Vec::new();
        let mut next = Some(self.start_term.clone());
        while let Some(term) = next {
            if term > self.end_term {
                break;
            }
            next = increment_bytes(&term);
            rv.push(term);
        }
        rv
    }
}

/// Big-endian increment. `None` once every byte would wrap.
pub fn increment_bytes(input: &[u8]) -> Option<Vec<u8>> {
    let mut rv = input.to_vec();
    for byte in rv.iter_mut().rev() {
        let (incremented, overflow) = byte.overflowing_add(1);
        *byte = incremented;
        if !overflow {
            return Some(rv);
        }
    }
    None
}

/// Split `[min_bound, max_bound]` into prefix-coded term ranges using
/// `precision_step` bits per shift level.
pub fn split_int64_range(
    mut min_bound: i64,
    mut max_bound: i64,
    precision_step: u32,
) -> Result<Vec<TermRange>> {
    let mut rv = Vec::new();
    if min_bound > max_bound {
        return Ok(rv);
    }

    let mut shift = 0u32;
    loop {
        let diff = 1i64.checked_shl(shift + precision_step).unwrap_or(0);
        let mask = 1i64
            .wrapping_shl(precision_step)
            .wrapping_sub(1)
            .wrapping_shl(shift);
        let has_lower = min_bound & mask != 0;
        let has_upper = max_bound & mask != mask;

        let next_min_bound = if has_lower {
            min_bound.wrapping_add(diff) & !mask
        } else {
            min_bound & !mask
        };
        let next_max_bound = if has_upper {
            max_bound.wrapping_sub(diff) & !mask
        } else {
            max_bound & !mask
        };
        let lower_wrapped = next_min_bound < min_bound;
        let upper_wrapped = next_max_bound > max_bound;

        if shift + precision_step >= 64
            || next_min_bound > next_max_bound
            || lower_wrapped
            || upper_wrapped
        {
            rv.push(TermRange::new(min_bound, max_bound, shift)?);
            break;
        }

        if has_lower {
            rv.push(TermRange::new(min_bound, min_bound | mask, shift)?);
        }
        if has_upper {
            rv.push(TermRange::new(max_bound & !mask, max_bound, shift)?);
        }

        min_bound = next_min_bound;
        max_bound = next_max_bound;
        shift += precision_step;
    }
    Ok(rv)
}

/// Matches numeric field values in a range.
///
/// Bounds default to an open `[-inf, +inf)`: the minimum is inclusive and
/// the maximum exclusive unless stated otherwise.
#[derive(Debug)]
pub struct NumericRangeSearcher {
    searcher: MultiTermSearcher,
}

impl NumericRangeSearcher {
    /// Create a new numeric range searcher.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index_reader: &dyn IndexReader,
        min: Option<f64>,
        max: Option<f64>,
        inclusive_min: Option<bool>,
        inclusive_max: Option<bool>,
        field: &str,
        boost: f64,
        options: SearcherOptions,
        config: SearcherConfig,
    ) -> Result<Self> {
        let min = float64_to_int64(min.unwrap_or(f64::NEG_INFINITY));
        let max = float64_to_int64(max.unwrap_or(f64::INFINITY));
        let searcher = new_int64_range_searcher(
            index_reader,
            min,
            max,
            inclusive_min.unwrap_or(true),
            inclusive_max.unwrap_or(false),
            field,
            boost,
            options,
            config,
        )?;
        Ok(NumericRangeSearcher { searcher })
    }
}

delegate_searcher!(NumericRangeSearcher, searcher);

/// Build the term disjunction for a range over sortable int64 values.
#[allow(clippy::too_many_arguments)]
pub(crate) fn new_int64_range_searcher(
    index_reader: &dyn IndexReader,
    mut min: i64,
    mut max: i64,
    inclusive_min: bool,
    inclusive_max: bool,
    field: &str,
    boost: f64,
    options: SearcherOptions,
    config: SearcherConfig,
) -> Result<MultiTermSearcher> {
    if !inclusive_min && min != i64::MAX {
        min += 1;
    }
    if !inclusive_max && max != i64::MIN {
        max -= 1;
    }

    let ranges = split_int64_range(min, max, NUMERIC_PRECISION_STEP)?;
    let enumerated: Vec<Vec<Vec<u8>>> = ranges.iter().map(TermRange::enumerate).collect();
    let candidates: usize = enumerated.iter().map(Vec::len).sum();
    if config.too_many_clauses(candidates) {
        return Err(LancetError::too_many_clauses(config.max_clause_count));
    }

    // only candidates the dictionary holds get a term searcher
    let mut terms = Vec::new();
    for (range, range_terms) in ranges.iter().zip(enumerated) {
        let range_terms: AHashSet<Vec<u8>> = range_terms.into_iter().collect();
        let dict = index_reader.field_dict_range(field, &range.start_term, &range.end_term)?;
        terms.extend(collect_terms(dict, SearcherConfig::default(), |term| {
            range_terms.contains(term)
        })?);
    }
    debug!(
        "range [{min}, {max}] in field {field}: {} term ranges, {candidates} candidates, {} terms",
        ranges.len(),
        terms.len()
    );

    MultiTermSearcher::new(index_reader, &terms, field, boost, options, config)
}
