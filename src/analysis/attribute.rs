//! Open-ended token attributes.
//!
//! A token stream carries more than term text: offsets, types, flags and
//! whatever else the pipeline's filters attach. The set differs between
//! pipelines, so streams publish it through [`AttributeReflector`] instead of
//! exposing concrete accessors. Every attribute is reported as an attribute
//! group name, a mixed-case key and an [`AttributeValue`].
//!
//! # Examples
//!
//! ```
//! use analyze_api::analysis::attribute::{AttributeReflector, AttributeValue};
//!
//! let mut seen = Vec::new();
//! let mut reflector = |_group: &str, key: &str, value: AttributeValue| {
//!     seen.push((key.to_string(), value));
//! };
//! reflector.reflect("OffsetAttribute", "startOffset", AttributeValue::Integer(0));
//!
//! assert_eq!(seen[0].0, "startOffset");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tagged attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Raw byte sequence; rendered as text before it is emitted.
    Bytes(Vec<u8>),
}

impl AttributeValue {
    /// Render a byte sequence as `[68 65 6c 6c 6f]`.
    pub fn bytes_to_text(bytes: &[u8]) -> String {
        let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("[{}]", hex.join(" "))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::Bytes(b) => write!(f, "{}", Self::bytes_to_text(b)),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}

/// Visitor that receives every attribute of the current token.
pub trait AttributeReflector {
    /// Called once per attribute key, in the order the stream exposes them.
    fn reflect(&mut self, attribute: &str, key: &str, value: AttributeValue);
}

impl<F> AttributeReflector for F
where
    F: FnMut(&str, &str, AttributeValue),
{
    fn reflect(&mut self, attribute: &str, key: &str, value: AttributeValue) {
        self(attribute, key, value)
    }
}
