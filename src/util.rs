//! Shared helpers used across Lancet components.

pub mod levenshtein;

pub use levenshtein::{LevenshteinMatcher, levenshtein_distance, levenshtein_distance_max};
