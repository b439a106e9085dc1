//! Lowercase filter implementation.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::token_filter::Filter;
//! use analyze_api::analysis::token_filter::lowercase::LowercaseFilter;
//! use analyze_api::analysis::token::{IntoTokenIter, Token};
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("The"), Token::new("QUICK")];
//! let result: Vec<_> = filter.filter(tokens.into_token_iter()).unwrap().collect();
//!
//! assert_eq!(result[0].text, "the");
//! assert_eq!(result[1].text, "quick");
//! ```

use crate::analysis::token::TokenIter;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that converts tokens to lowercase.
///
/// Stopped tokens pass through untouched; offsets and position increments
/// are preserved.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenIter) -> Result<TokenIter> {
        Ok(Box::new(tokens.map(|mut token| {
            if !token.is_stopped() {
                token.text = token.text.to_lowercase();
            }
            token
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
