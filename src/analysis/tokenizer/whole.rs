//! Tokenizer that emits its whole input as one keyword token.

use crate::analysis::token::{Token, TokenIter};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Emits the input unsplit, spanning every byte, flagged as a keyword.
///
/// Empty input produces no token. Whitespace-only input is still one token.
#[derive(Clone, Debug, Default)]
pub struct WholeTokenizer;

impl WholeTokenizer {
    pub fn new() -> Self {
        WholeTokenizer
    }
}

impl Tokenizer for WholeTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenIter> {
        let token = (!text.is_empty())
            .then(|| Token::with_offsets(text, 0, text.len()).as_keyword());
        Ok(Box::new(token.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whole"
    }
}
