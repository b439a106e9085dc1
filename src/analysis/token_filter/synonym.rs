//! Single-term synonym filter.
//!
//! For every token whose text has synonyms, the filter emits the original
//! token followed by one token per synonym. Synonyms share the original's
//! offsets, carry a position increment of 0 (stacked on the same position)
//! and the `SYNONYM` token type.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::token_filter::Filter;
//! use analyze_api::analysis::token_filter::synonym::SynonymFilter;
//! use analyze_api::analysis::token::{IntoTokenIter, Token};
//!
//! let filter = SynonymFilter::new().with_synonyms("quick", ["fast"]);
//! let tokens = vec![Token::new("quick"), Token::new("fox")];
//! let result: Vec<_> = filter.filter(tokens.into_token_iter()).unwrap().collect();
//!
//! assert_eq!(result.len(), 3);
//! assert_eq!(result[1].text, "fast");
//! assert_eq!(result[1].position_increment, 0);
//! ```

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::token::{Token, TokenIter, TokenType};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Stacks configured synonyms on top of matching tokens.
#[derive(Clone, Debug, Default)]
pub struct SynonymFilter {
    synonyms: Arc<AHashMap<String, Vec<String>>>,
    boost: Option<f32>,
}

impl SynonymFilter {
    /// Create a filter without synonyms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register synonyms for a term. Registration is one-directional.
    pub fn with_synonyms<I, S>(mut self, term: &str, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::make_mut(&mut self.synonyms)
            .entry(term.to_string())
            .or_default()
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Register a group of mutually equivalent terms.
    pub fn with_equivalents<S: AsRef<str>>(mut self, group: &[S]) -> Self {
        for term in group {
            let others: Vec<String> = group
                .iter()
                .map(|s| s.as_ref().to_string())
                .filter(|s| s != term.as_ref())
                .collect();
            self = self.with_synonyms(term.as_ref(), others);
        }
        self
    }

    /// Apply a boost to generated synonym tokens.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Synonyms registered for a term.
    pub fn synonyms_of(&self, term: &str) -> &[String] {
        self.synonyms.get(term).map(|s| s.as_slice()).unwrap_or(&[])
    }
}

impl Filter for SynonymFilter {
    fn filter(&self, tokens: TokenIter) -> Result<TokenIter> {
        let mut result = Vec::new();

        for token in tokens {
            let synonyms = if token.is_stopped() || token.keyword {
                &[][..]
            } else {
                self.synonyms_of(&token.text)
            };

            let stacked: Vec<Token> = synonyms
                .iter()
                .map(|synonym| {
                    let mut synonym = token
                        .with_text(synonym.as_str())
                        .with_position_increment(0)
                        .with_token_type(TokenType::Synonym)
                        .with_original_text(token.text.as_str());
                    if let Some(boost) = self.boost {
                        synonym = synonym.with_boost(boost);
                    }
                    synonym
                })
                .collect();

            result.push(token);
            result.extend(stacked);
        }

        Ok(Box::new(result.into_iter()))
    }

    fn name(&self) -> &'static str {
        "synonym"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::IntoTokenIter;

    #[test]
    fn test_synonyms_are_stacked() {
        let filter = SynonymFilter::new().with_synonyms("big", ["large", "huge"]);
        let tokens = vec![
            Token::with_offsets("big", 0, 3),
            Token::with_offsets("dog", 4, 7),
        ];

        let result: Vec<Token> = filter.filter(tokens.into_token_iter()).unwrap().collect();

        let texts: Vec<&str> = result.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["big", "large", "huge", "dog"]);
        assert_eq!(result[1].position_increment, 0);
        assert_eq!(result[2].position_increment, 0);
        assert_eq!(result[1].start_offset, 0);
        assert_eq!(result[1].end_offset, 3);
        assert_eq!(result[1].token_type(), Some(TokenType::Synonym));
        assert_eq!(
            result[1].metadata().unwrap().original_text.as_deref(),
            Some("big")
        );
        assert_eq!(result[3].position_increment, 1);
    }

    #[test]
    fn test_equivalents() {
        let filter = SynonymFilter::new().with_equivalents(&["ml", "machine_learning"]);

        assert_eq!(filter.synonyms_of("ml"), ["machine_learning".to_string()]);
        assert_eq!(filter.synonyms_of("machine_learning"), ["ml".to_string()]);
        assert!(filter.synonyms_of("ai").is_empty());
    }

    #[test]
    fn test_boost_and_keyword() {
        let filter = SynonymFilter::new()
            .with_synonyms("tv", ["television"])
            .with_boost(0.5);
        let tokens = vec![Token::new("tv"), Token::new("tv").as_keyword()];

        let result: Vec<Token> = filter.filter(tokens.into_token_iter()).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[1].boost, 0.5);
        assert_eq!(result[2].text, "tv");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(SynonymFilter::new().name(), "synonym");
    }
}
