//! Analyzers: complete tokenization pipelines.
//!
//! An analyzer turns raw text into tokens by running a tokenizer followed by
//! a chain of filters. Consumers do not pull the tokens directly; they open
//! a [`TokenStream`] with [`Analyzer::token_stream`] and drive it through its
//! lifecycle.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → TokenStream
//! ```
//!
//! # Available Implementations
//!
//! - [`StandardAnalyzer`](standard::StandardAnalyzer) - Unicode words, lowercase, English stop words
//! - [`WhitespaceAnalyzer`](whitespace::WhitespaceAnalyzer) - Splits on whitespace, keeps case
//! - [`KeywordAnalyzer`](keyword::KeywordAnalyzer) - Treats entire input as one token
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::analyzer::Analyzer;
//! use analyze_api::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use crate::analysis::stream::{BufferedTokenStream, TokenStream};
use crate::analysis::token::TokenIter;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync`: one analyzer instance serves every
/// concurrent batch, each through its own token stream.
pub trait Analyzer: Send + Sync {
    /// Run the pipeline over `text` and return the produced tokens.
    fn analyze(&self, text: &str) -> Result<TokenIter>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;

    /// Open a single-use token stream over `text`.
    ///
    /// The default implementation buffers [`analyze`](Self::analyze) behind
    /// [`BufferedTokenStream`]. Pipelines with their own stateful streams
    /// override it.
    fn token_stream(&self, text: &str) -> Result<Box<dyn TokenStream>> {
        Ok(Box::new(BufferedTokenStream::new(self.analyze(text)?)))
    }
}

pub mod keyword;
pub mod pipeline;
pub mod standard;
pub mod whitespace;
