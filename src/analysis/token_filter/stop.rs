//! Stop filter implementation.
//!
//! Removes common words (stop words) from the token sequence. A removed
//! token does not disappear without trace: its position increment is added
//! to the next kept token, so consumers still see the gap.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::token_filter::Filter;
//! use analyze_api::analysis::token_filter::stop::StopFilter;
//! use analyze_api::analysis::token::{IntoTokenIter, Token};
//!
//! let filter = StopFilter::new(); // Uses default English stop words
//! let tokens = vec![Token::new("the"), Token::new("quick"), Token::new("brown")];
//!
//! let result: Vec<_> = filter.filter(tokens.into_token_iter()).unwrap().collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "quick");
//! assert_eq!(result[0].position_increment, 2);
//! assert_eq!(result[1].position_increment, 1);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{Token, TokenIter};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that removes stop words from the token sequence.
///
/// With `remove_stopped(false)` the tokens are kept but marked as stopped,
/// and no position gap is introduced.
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words to remove
    stop_words: Arc<HashSet<String>>,
    /// Whether to remove stopped tokens entirely or just mark them as stopped
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
            remove_stopped: true,
        }
    }

    /// Create a new stop filter from a list of stop words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words.into_iter().map(|s| s.into()).collect();
        Self::with_stop_words(stop_words)
    }

    /// Set whether to remove stopped tokens entirely or just mark them as stopped.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenIter) -> Result<TokenIter> {
        let mut kept: Vec<Token> = Vec::new();
        let mut skipped = 0;

        for token in tokens {
            if !token.is_stopped() && self.is_stop_word(&token.text) {
                if self.remove_stopped {
                    skipped += token.position_increment;
                    continue;
                }
                kept.push(token.stop());
                continue;
            }

            let increment = token.position_increment + skipped;
            skipped = 0;
            kept.push(token.with_position_increment(increment));
        }

        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
