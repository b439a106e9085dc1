//! The stateful token stream protocol.
//!
//! A [`TokenStream`] is the single-use object produced by opening an analyzer
//! over one text. Consumers must drive it in a fixed order:
//!
//! ```text
//! reset() -> increment_token()* -> end() -> close()
//! ```
//!
//! `increment_token` advances to the next token and returns `false` once the
//! stream is exhausted. While positioned on a token, [`TokenStream::term`],
//! [`TokenStream::position_increment`] and [`TokenStream::reflect_with`]
//! describe it.
//!
//! [`BufferedTokenStream`] adapts the token iterator of any
//! [`Analyzer`](crate::analysis::analyzer::Analyzer) to this protocol and
//! rejects out-of-order calls.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::stream::{BufferedTokenStream, TokenStream};
//! use analyze_api::analysis::token::{IntoTokenIter, Token};
//!
//! let tokens = vec![Token::new("hello"), Token::new("world")];
//! let mut stream = BufferedTokenStream::new(tokens.into_token_iter());
//!
//! stream.reset().unwrap();
//! let mut terms = Vec::new();
//! while stream.increment_token().unwrap() {
//!     terms.push(stream.term().to_string());
//! }
//! stream.end().unwrap();
//! stream.close().unwrap();
//!
//! assert_eq!(terms, vec!["hello", "world"]);
//! ```

use crate::analysis::attribute::{AttributeReflector, AttributeValue};
use crate::analysis::token::{Token, TokenIter};
use crate::error::{AnalyzeError, Result};

/// The token stream lifecycle every consumer must follow.
pub trait TokenStream: Send {
    /// Reset the stream to its initial iteration state. Must be called once
    /// before the first `increment_token`.
    fn reset(&mut self) -> Result<()>;

    /// Advance to the next token. Returns `false` when exhausted.
    fn increment_token(&mut self) -> Result<bool>;

    /// Term text of the current token.
    fn term(&self) -> &str;

    /// Position increment of the current token.
    fn position_increment(&self) -> usize;

    /// Publish every other attribute of the current token, in a stable order.
    fn reflect_with(&self, reflector: &mut dyn AttributeReflector);

    /// Finalize the stream after exhaustion.
    fn end(&mut self) -> Result<()>;

    /// Release the stream's resources. Calling it more than once is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Whether `close` has completed.
    fn is_closed(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Created,
    Reset,
    Exhausted,
    Ended,
    Closed,
}

/// Adapts a [`TokenIter`] to the [`TokenStream`] protocol.
pub struct BufferedTokenStream {
    tokens: Option<TokenIter>,
    current: Option<Token>,
    state: StreamState,
}

impl BufferedTokenStream {
    /// Wrap a token iterator. Nothing is pulled until `increment_token`.
    pub fn new(tokens: TokenIter) -> Self {
        BufferedTokenStream {
            tokens: Some(tokens),
            current: None,
            state: StreamState::Created,
        }
    }

    fn violation(&self, call: &str) -> AnalyzeError {
        AnalyzeError::analysis(format!(
            "TokenStream contract violation: {call} called in state {:?}",
            self.state
        ))
    }
}

impl TokenStream for BufferedTokenStream {
    fn reset(&mut self) -> Result<()> {
        match self.state {
            StreamState::Created => {
                self.state = StreamState::Reset;
                Ok(())
            }
            _ => Err(self.violation("reset()")),
        }
    }

    fn increment_token(&mut self) -> Result<bool> {
        match self.state {
            StreamState::Reset => {}
            StreamState::Exhausted => return Ok(false),
            _ => return Err(self.violation("increment_token()")),
        }

        self.current = self.tokens.as_mut().and_then(|tokens| tokens.next());
        if self.current.is_none() {
            self.state = StreamState::Exhausted;
        }
        Ok(self.current.is_some())
    }

    fn term(&self) -> &str {
        self.current.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    fn position_increment(&self) -> usize {
        self.current
            .as_ref()
            .map(|t| t.position_increment)
            .unwrap_or(0)
    }

    fn reflect_with(&self, reflector: &mut dyn AttributeReflector) {
        let Some(token) = self.current.as_ref() else {
            return;
        };

        reflector.reflect(
            "TermToBytesRefAttribute",
            "bytes",
            AttributeValue::Bytes(token.text.as_bytes().to_vec()),
        );
        reflector.reflect(
            "OffsetAttribute",
            "startOffset",
            token.start_offset.into(),
        );
        reflector.reflect("OffsetAttribute", "endOffset", token.end_offset.into());
        reflector.reflect(
            "PositionIncrementAttribute",
            "positionIncrement",
            token.position_increment.into(),
        );
        reflector.reflect(
            "PositionLengthAttribute",
            "positionLength",
            token.position_length.into(),
        );
        let token_type = token
            .token_type()
            .map(|t| t.label())
            .unwrap_or("word");
        reflector.reflect("TypeAttribute", "type", token_type.into());
        reflector.reflect("KeywordAttribute", "keyword", token.keyword.into());
        reflector.reflect("BoostAttribute", "boost", token.boost.into());

        if let Some(metadata) = token.metadata() {
            if let Some(original) = &metadata.original_text {
                reflector.reflect(
                    "OriginalTextAttribute",
                    "originalText",
                    original.as_str().into(),
                );
            }
            if let Some(language) = &metadata.language {
                reflector.reflect("LanguageAttribute", "language", language.as_str().into());
            }
            for (key, value) in &metadata.attributes {
                reflector.reflect("CustomAttribute", key, value.as_str().into());
            }
        }
    }

    fn end(&mut self) -> Result<()> {
        match self.state {
            StreamState::Reset | StreamState::Exhausted => {
                self.current = None;
                self.state = StreamState::Ended;
                Ok(())
            }
            _ => Err(self.violation("end()")),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.tokens = None;
        self.current = None;
        self.state = StreamState::Closed;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state == StreamState::Closed
    }
}
