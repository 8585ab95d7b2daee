//! Tokenizers that split text into positioned tokens.
//!
//! - [`regex::RegexTokenizer`] - extracts every match of a pattern (default `\w+`)
//! - [`unicode_word::UnicodeWordTokenizer`] - splits on Unicode word boundaries

pub mod regex;
pub mod unicode_word;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync + std::fmt::Debug {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
