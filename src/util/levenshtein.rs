//! Edit distance between terms.
//!
//! Distances count single-character (Unicode scalar) insertions, deletions
//! and substitutions. Fuzzy term expansion only cares whether a candidate
//! is within a small budget, so [`levenshtein_distance_max`] stops as soon
//! as every cell of a row is over the budget.

use std::cmp::min;

/// Full Levenshtein distance between two strings.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    distance_chars(&a, &b, usize::MAX).0
}

/// Levenshtein distance bounded by `max`.
///
/// Returns the distance and whether it exceeded `max`. When exceeded, the
/// returned distance is only a lower bound.
pub fn levenshtein_distance_max(s1: &str, s2: &str, max: usize) -> (usize, bool) {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    distance_chars(&a, &b, max)
}

// Two-row dynamic program with early exit once a whole row is over `max`.
fn distance_chars(a: &[char], b: &[char], max: usize) -> (usize, bool) {
    let length_diff = a.len().abs_diff(b.len());
    if length_diff > max {
        return (length_diff, true);
    }
    if a.is_empty() || b.is_empty() {
        let d = a.len().max(b.len());
        return (d, d > max);
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = i + 1;
        let mut row_min = curr_row[0];

        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = min(
                min(prev_row[j + 1] + 1, curr_row[j] + 1),
                prev_row[j] + cost,
            );
            row_min = min(row_min, curr_row[j + 1]);
        }

        if row_min > max {
            return (row_min, true);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[b.len()];
    (distance, distance > max)
}

/// Matches many candidate terms against one query term.
///
/// The query's characters are decoded once and reused for every candidate.
#[derive(Debug, Clone)]
pub struct LevenshteinMatcher {
    query: String,
    query_chars: Vec<char>,
}

impl LevenshteinMatcher {
    pub fn new<S: Into<String>>(query: S) -> Self {
        let query = query.into();
        let query_chars = query.chars().collect();
        LevenshteinMatcher { query, query_chars }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Distance to `candidate`, or `None` when it is more than `max` edits away.
    pub fn distance_within(&self, candidate: &str, max: usize) -> Option<usize> {
        let candidate: Vec<char> = candidate.chars().collect();
        match distance_chars(&self.query_chars, &candidate, max) {
            (_, true) => None,
            (d, false) => Some(d),
        }
    }

    pub fn is_match(&self, candidate: &str, max: usize) -> bool {
        self.distance_within(candidate, max).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("", "a"), 1);
        assert_eq!(levenshtein_distance("a", ""), 1);
        assert_eq!(levenshtein_distance("ab", "ac"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("beer", "beet"), 1);
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_levenshtein_distance_max() {
        assert_eq!(levenshtein_distance_max("kitten", "sitting", 3), (3, false));
        assert!(levenshtein_distance_max("kitten", "sitting", 2).1);
        assert_eq!(levenshtein_distance_max("a", "abc", 1), (2, true));
        assert_eq!(levenshtein_distance_max("a", "ab", 1), (1, false));
        assert_eq!(levenshtein_distance_max("", "ab", 1), (2, true));
    }

    #[test]
    fn test_matcher() {
        let matcher = LevenshteinMatcher::new("beet");
        assert_eq!(matcher.query(), "beet");
        assert_eq!(matcher.distance_within("beer", 1), Some(1));
        assert_eq!(matcher.distance_within("beet", 0), Some(0));
        assert!(matcher.is_match("bet", 1));
        assert!(!matcher.is_match("marty", 2));
    }
}
