//! Analyzers: a tokenizer followed by lower-casing.

use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::config::{IndexConfig, TokenizerKind};
use crate::error::Result;

/// Tokenizes text and lower-cases every token.
#[derive(Clone, Debug)]
pub struct Analyzer {
    tokenizer: Arc<dyn Tokenizer>,
}

impl Analyzer {
    /// Create an analyzer around the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Analyzer { tokenizer }
    }

    /// An analyzer that extracts matches of `pattern`.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(RegexTokenizer::with_pattern(pattern)?)))
    }

    /// The analyzer an index with `config` uses for text fields.
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        match config.tokenizer {
            TokenizerKind::Regex => Self::with_pattern(&config.token_pattern),
            TokenizerKind::UnicodeWord => Ok(Self::new(Arc::new(UnicodeWordTokenizer::new()))),
        }
    }

    /// Analyze text into a token stream.
    pub fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text)?;
        Ok(Box::new(tokens.map(|token| Token {
            text: token.text.to_lowercase(),
            ..token
        })))
    }

    /// Name of the underlying tokenizer.
    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_tokens() {
        let analyzer = Analyzer::with_pattern(r"\w+").unwrap();
        let tokens: Vec<Token> = analyzer.analyze("Couchbase WAY").unwrap().collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["couchbase", "way"]);
        assert_eq!(tokens[1].start_offset, 10);
    }

    #[test]
    fn test_unicode_tokenizer() {
        let config = IndexConfig {
            tokenizer: TokenizerKind::UnicodeWord,
            ..IndexConfig::default()
        };
        let analyzer = Analyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.tokenizer_name(), "unicode_word");
        let tokens: Vec<Token> = analyzer.analyze("Ünïcode Text").unwrap().collect();
        assert_eq!(tokens[0].text, "ünïcode");
    }
}
