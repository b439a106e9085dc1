//! Token filter implementations for token transformation.
//!
//! Filters receive the tokens produced by a tokenizer (or a previous filter)
//! and return a new sequence. They may rewrite text, drop tokens, or stack
//! new tokens on existing positions.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes stop words, keeping their position gaps
//! - [`synonym::SynonymFilter`] - Stacks single-term synonyms on the original
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::token_filter::Filter;
//! use analyze_api::analysis::token_filter::lowercase::LowercaseFilter;
//! use analyze_api::analysis::token::{IntoTokenIter, Token};
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello"), Token::new("WORLD")];
//! let filtered: Vec<_> = filter.filter(tokens.into_token_iter())
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenIter;
use crate::error::Result;

/// Trait for filters that transform token sequences.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token sequence.
    fn filter(&self, tokens: TokenIter) -> Result<TokenIter>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod stop;
pub mod synonym;
