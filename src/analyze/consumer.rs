//! Token stream consumer.
//!
//! Drives one analyzer over one text and turns every token into a
//! [`TokenRecord`]. The stream is held by a [`StreamGuard`], so `end` and
//! `close` run on every exit path, including errors raised mid-stream.
//!
//! Positions are accumulated from position increments: the counter starts at
//! 0 and every token with a non-zero increment advances it by that amount.
//! Increments `[1, 1, 0, 2]` therefore produce positions `[1, 2, 2, 4]`.

use std::ops::{Deref, DerefMut};

use log::{debug, warn};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::attribute::AttributeValue;
use crate::analysis::stream::TokenStream;
use crate::analyze::options::{OutputOptions, POSITION_PARAM};
use crate::analyze::projector::project;
use crate::error::Result;

const TERM_FIELD: &str = "term";

/// One emitted token: its term, optional position and enabled attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenRecord {
    pub term: String,
    pub position: Option<usize>,
    pub attributes: Vec<(String, Value)>,
}

impl TokenRecord {
    pub fn new<S: Into<String>>(term: S) -> Self {
        TokenRecord {
            term: term.into(),
            position: None,
            attributes: Vec::new(),
        }
    }

    /// Value of a projected attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn push_attribute(&mut self, key: String, value: Value) {
        // term and position are computed fields; a pipeline attribute must not shadow them
        if key == TERM_FIELD || key == POSITION_PARAM || self.attribute(&key).is_some() {
            debug!("Skipping duplicate token field [{key}]");
            return;
        }
        self.attributes.push((key, value));
    }
}

impl Serialize for TokenRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.position.is_some()) + self.attributes.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(TERM_FIELD, &self.term)?;
        if let Some(position) = self.position {
            map.serialize_entry(POSITION_PARAM, &position)?;
        }
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Owns an open token stream and releases it when dropped.
pub struct StreamGuard {
    stream: Box<dyn TokenStream>,
    ended: bool,
    closed: bool,
}

impl StreamGuard {
    /// Open `analyzer`'s stream over `text`.
    pub fn open(analyzer: &dyn Analyzer, text: &str) -> Result<Self> {
        Ok(StreamGuard {
            stream: analyzer.token_stream(text)?,
            ended: false,
            closed: false,
        })
    }

    /// Wrap a stream that was opened elsewhere.
    pub fn new(stream: Box<dyn TokenStream>) -> Self {
        StreamGuard {
            stream,
            ended: false,
            closed: false,
        }
    }

    /// Run `end` then `close`. If `end` fails, `close` still runs on drop.
    /// `close` is attempted once, whatever it returns.
    pub fn finish(mut self) -> Result<()> {
        self.ended = true;
        self.stream.end()?;
        self.closed = true;
        self.stream.close()
    }
}

impl Deref for StreamGuard {
    type Target = dyn TokenStream;

    fn deref(&self) -> &Self::Target {
        self.stream.as_ref()
    }
}

impl DerefMut for StreamGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream.as_mut()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.closed || self.stream.is_closed() {
            return;
        }
        if !self.ended {
            self.ended = true;
            if let Err(e) = self.stream.end() {
                warn!("Failed to end token stream: {e}");
            }
        }
        self.closed = true;
        if let Err(e) = self.stream.close() {
            warn!("Failed to close token stream: {e}");
        }
    }
}

/// Run `analyzer` over `text` and collect one record per emitted token, in
/// emission order.
pub fn consume(
    analyzer: &dyn Analyzer,
    text: &str,
    options: &OutputOptions,
) -> Result<Vec<TokenRecord>> {
    let mut stream = StreamGuard::open(analyzer, text)?;
    stream.reset()?;

    let include_position = options.include_position();
    let mut position = 0usize;
    let mut records = Vec::new();

    while stream.increment_token()? {
        let increment = stream.position_increment();
        if increment > 0 {
            position = position.saturating_add(increment);
        }

        let mut record = TokenRecord::new(stream.term());
        if include_position {
            record.position = Some(position);
        }

        stream.reflect_with(&mut |_attribute: &str, key: &str, value: AttributeValue| {
            if let Some((key, value)) = project(key, value, options) {
                record.push_attribute(key, value);
            }
        });

        records.push(record);
    }

    stream.finish()?;
    debug!(
        "Analyzer [{}] produced {} tokens",
        analyzer.name(),
        records.len()
    );
    Ok(records)
}
