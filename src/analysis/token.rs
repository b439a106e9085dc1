//! Token types and utilities for text analysis.
//!
//! This module defines the data structures that flow through an analysis
//! pipeline before they are exposed through the [`TokenStream`] protocol.
//!
//! # Core Types
//!
//! - [`Token`] - A single analyzed token with text, offsets, and metadata
//! - [`TokenType`] - Classification of token content (alphanumeric, CJK, etc.)
//! - [`TokenMetadata`] - Additional metadata attached to tokens
//! - [`TokenIter`] - Type alias for boxed iterator of tokens
//!
//! # Token Graphs
//!
//! Tokens do not carry an absolute position. Consumers derive it from
//! `position_increment`, which lets filters stack synonyms (increment 0) or
//! leave gaps where stop words were removed (increment > 1):
//!
//! ```text
//! Input: "the quick fast fox"   (stop: "the", synonym: quick -> fast)
//!
//!   "quick" (pos_inc=2)   <- gap left by "the"
//!   "fast"  (pos_inc=0)   <- stacked on "quick"
//!   "fox"   (pos_inc=1)
//! ```
//!
//! [`TokenStream`]: crate::analysis::stream::TokenStream
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::token::{Token, TokenType};
//!
//! let token = Token::with_offsets("world", 6, 11)
//!     .with_token_type(TokenType::Alphanum)
//!     .with_position_increment(2);
//!
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.position_increment, 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Boost factor for this token (default: 1.0)
    pub boost: f32,

    /// Whether this token has been marked as stopped (removed) by a filter
    pub stopped: bool,

    /// Whether the token is a keyword; synonym expansion skips keywords
    pub keyword: bool,

    /// Additional metadata that can be attached to tokens
    pub metadata: Option<TokenMetadata>,

    /// Position increment from the previous token (default: 1).
    ///
    /// - 1: next position
    /// - 0: same position as previous token (e.g., synonyms)
    /// - >1: skipped positions (e.g., removed stop words)
    pub position_increment: usize,

    /// How many positions this token spans (default: 1).
    pub position_length: usize,
}

/// Token type classification for different kinds of tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Alphanumeric text (English, Latin scripts)
    Alphanum,
    /// Numeric values
    Num,
    /// CJK (Chinese, Japanese, Korean) characters
    Cjk,
    /// Katakana characters (Japanese)
    Katakana,
    /// Hiragana characters (Japanese)
    Hiragana,
    /// Hangul characters (Korean)
    Hangul,
    /// Punctuation marks
    Punctuation,
    /// Synonym token (generated by SynonymFilter)
    Synonym,
    /// Other/unknown token types
    Other,
}

impl TokenType {
    /// The label published through the `type` attribute.
    pub fn label(&self) -> &'static str {
        match self {
            TokenType::Alphanum => "<ALPHANUM>",
            TokenType::Num => "<NUM>",
            TokenType::Cjk => "<IDEOGRAPHIC>",
            TokenType::Katakana => "<KATAKANA>",
            TokenType::Hiragana => "<HIRAGANA>",
            TokenType::Hangul => "<HANGUL>",
            TokenType::Punctuation => "<PUNCTUATION>",
            TokenType::Synonym => "SYNONYM",
            TokenType::Other => "word",
        }
    }

    /// Classify a word by the scripts it contains.
    pub fn detect(word: &str) -> TokenType {
        if word.is_empty() {
            return TokenType::Other;
        }

        if word.chars().all(|c| c.is_ascii_digit()) {
            return TokenType::Num;
        }

        if word.chars().any(|c| {
            matches!(c,
                '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
                '\u{3400}'..='\u{4DBF}' |  // CJK Extension A
                '\u{20000}'..='\u{2A6DF}'  // CJK Extension B
            )
        }) {
            return TokenType::Cjk;
        }

        if word.chars().all(|c| matches!(c, '\u{30A0}'..='\u{30FF}')) {
            return TokenType::Katakana;
        }

        if word.chars().all(|c| matches!(c, '\u{3040}'..='\u{309F}')) {
            return TokenType::Hiragana;
        }

        if word
            .chars()
            .any(|c| matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}'))
        {
            return TokenType::Hangul;
        }

        if word.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return TokenType::Alphanum;
        }

        if word.chars().all(|c| c.is_ascii_punctuation()) {
            return TokenType::Punctuation;
        }

        TokenType::Other
    }
}

/// Additional metadata that can be attached to tokens
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// The original text before filtering
    pub original_text: Option<String>,

    /// Token type classification
    pub token_type: Option<TokenType>,

    /// Language hint for language-specific processing
    pub language: Option<String>,

    /// Additional custom attributes, kept sorted for stable reflection order
    pub attributes: BTreeMap<String, String>,
}

impl Token {
    /// Create a new token with the given text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self::with_offsets(text, 0, 0)
    }

    /// Create a new token with text and byte offsets.
    pub fn with_offsets<S: Into<String>>(text: S, start_offset: usize, end_offset: usize) -> Self {
        Token {
            text: text.into(),
            start_offset,
            end_offset,
            boost: 1.0,
            stopped: false,
            keyword: false,
            metadata: None,
            position_increment: 1,
            position_length: 1,
        }
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Set the boost factor for this token.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Mark this token as a keyword.
    pub fn as_keyword(mut self) -> Self {
        self.keyword = true;
        self
    }

    /// Get a reference to the metadata.
    pub fn metadata(&self) -> Option<&TokenMetadata> {
        self.metadata.as_ref()
    }

    /// Set the original text in metadata.
    pub fn with_original_text<S: Into<String>>(mut self, original: S) -> Self {
        let metadata = self.metadata.get_or_insert_with(TokenMetadata::new);
        metadata.original_text = Some(original.into());
        self
    }

    /// Set the token type in metadata.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        let metadata = self.metadata.get_or_insert_with(TokenMetadata::new);
        metadata.token_type = Some(token_type);
        self
    }

    /// Set a custom attribute in metadata.
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata
            .get_or_insert_with(TokenMetadata::new)
            .set_attribute(key, value);
        self
    }

    /// The token type, if a tokenizer or filter assigned one.
    pub fn token_type(&self) -> Option<TokenType> {
        self.metadata.as_ref().and_then(|m| m.token_type)
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Set the position increment.
    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    /// Set the position length.
    pub fn with_position_length(mut self, length: usize) -> Self {
        self.position_length = length;
        self
    }
}

impl TokenMetadata {
    /// Create a new empty metadata object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom attribute.
    pub fn set_attribute<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get a custom attribute.
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A lazily produced sequence of tokens from a tokenizer or filter.
pub type TokenIter = Box<dyn Iterator<Item = Token> + Send>;

/// Trait for types that can produce a token iterator.
pub trait IntoTokenIter {
    /// Convert this type into a token iterator.
    fn into_token_iter(self) -> TokenIter;
}

impl IntoTokenIter for Vec<Token> {
    fn into_token_iter(self) -> TokenIter {
        Box::new(self.into_iter())
    }
}
