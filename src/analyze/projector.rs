//! Attribute projection: decide whether a reflected token attribute is
//! emitted, and in which form.
//!
//! Keys are normalized from mixed-case identifiers to lowercase
//! underscore-separated names ([`decamelize`]); the normalized key is both
//! the flag looked up in [`OutputOptions`] and the emitted field name.
//! Raw byte values are rendered as text. A value that cannot be encoded is
//! logged and dropped; projection never fails the batch.

use log::warn;
use serde_json::{Number, Value};

use crate::analysis::attribute::AttributeValue;
use crate::analyze::options::OutputOptions;
use crate::error::{AnalyzeError, Result};

/// Convert `positionLength` / `PositionLength` into `position_length`.
///
/// Every uppercase letter starts a new `_`-prefixed segment unless nothing
/// has been written yet, spaces become `_`, other alphabetic characters are
/// lowercased, and everything else is dropped.
pub fn decamelize(key: &str) -> String {
    let mut buf = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            if !buf.is_empty() {
                buf.push('_');
            }
            buf.extend(c.to_lowercase());
        } else if c == ' ' {
            buf.push('_');
        } else if c.is_alphabetic() {
            buf.extend(c.to_lowercase());
        }
    }
    buf
}

/// Project one attribute. Returns the normalized key and JSON value when the
/// caller enabled the attribute and the value could be encoded.
pub fn project(key: &str, value: AttributeValue, options: &OutputOptions) -> Option<(String, Value)> {
    let key_name = decamelize(key);
    if !options.is_enabled(&key_name) {
        return None;
    }

    let display = value.to_string();
    match to_json(value) {
        Ok(json) => Some((key_name, json)),
        Err(e) => {
            warn!("Failed to write {key}:{display}: {e}");
            None
        }
    }
}

/// Encode an attribute value as JSON, rendering raw bytes as text.
pub fn to_json(value: AttributeValue) -> Result<Value> {
    match value {
        AttributeValue::Text(s) => Ok(Value::String(s)),
        AttributeValue::Integer(i) => Ok(Value::from(i)),
        AttributeValue::Boolean(b) => Ok(Value::Bool(b)),
        AttributeValue::Bytes(bytes) => Ok(Value::String(AttributeValue::bytes_to_text(&bytes))),
        AttributeValue::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| AnalyzeError::other(format!("non-finite number {f} cannot be encoded"))),
    }
}
