//! Whitespace analyzer: splits on whitespace and keeps the original case.

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenIter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

#[derive(Debug)]
pub struct WhitespaceAnalyzer {
    tokenizer: WhitespaceTokenizer,
}

impl WhitespaceAnalyzer {
    pub fn new() -> Self {
        WhitespaceAnalyzer {
            tokenizer: WhitespaceTokenizer::new(),
        }
    }
}

impl Default for WhitespaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenIter> {
        self.tokenizer.tokenize(text)
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}
