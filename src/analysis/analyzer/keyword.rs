//! Keyword analyzer that treats the entire input as a single token.
//!
//! The emitted token is flagged as a keyword, so synonym expansion
//! leaves it alone.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::analyzer::Analyzer;
//! use analyze_api::analysis::analyzer::keyword::KeywordAnalyzer;
//!
//! let analyzer = KeywordAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("user-123-abc").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "user-123-abc");
//! assert!(tokens[0].keyword);
//! ```

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenIter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whole::WholeTokenizer;
use crate::error::Result;

/// A keyword analyzer that treats the entire input as a single token.
#[derive(Debug)]
pub struct KeywordAnalyzer {
    tokenizer: WholeTokenizer,
}

impl KeywordAnalyzer {
    /// Create a new keyword analyzer.
    pub fn new() -> Self {
        KeywordAnalyzer {
            tokenizer: WholeTokenizer::new(),
        }
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenIter> {
        self.tokenizer.tokenize(text)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
