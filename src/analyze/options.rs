//! Caller-supplied output flags and request defaults.
//!
//! Output flags arrive as query-style `key=value` parameters. A flag is on
//! when its value is anything other than `false`, `0`, `off` or `no`; a bare
//! key (empty value) counts as on. Unknown flags are accepted and simply
//! never consulted.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analyze::options::OutputOptions;
//!
//! let options = OutputOptions::from_params([("position", "true"), ("type", ""), ("keyword", "no")]);
//!
//! assert!(options.include_position());
//! assert!(options.is_enabled("type"));
//! assert!(!options.is_enabled("keyword"));
//! assert!(!options.is_enabled("start_offset"));
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Parameter that controls the computed `position` field.
pub const POSITION_PARAM: &str = "position";

/// Parameter that controls pretty-printing of the response document.
pub const PRETTY_PARAM: &str = "pretty";

/// Parse a boolean parameter value.
///
/// `None` yields `default`; `false`, `0`, `off` and `no` yield `false`;
/// everything else, including the empty string, yields `true`.
pub fn parse_boolean(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => !matches!(v, "false" | "0" | "off" | "no"),
    }
}

/// Boolean output flags keyed by normalized attribute name.
#[derive(Clone, Debug, Default)]
pub struct OutputOptions {
    params: AHashMap<String, String>,
}

impl OutputOptions {
    /// Create options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from `(key, value)` parameter pairs. Later pairs win.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        OutputOptions { params }
    }

    /// Split a `key=value` (or bare `key`) parameter.
    pub fn parse_param(param: &str) -> (String, String) {
        match param.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (param.trim().to_string(), String::new()),
        }
    }

    /// Set a raw parameter value.
    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Turn a flag on.
    pub fn enable<K: Into<String>>(self, key: K) -> Self {
        self.with_param(key, "true")
    }

    /// Raw parameter value, if supplied.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|v| v.as_str())
    }

    /// Interpret a parameter as a boolean.
    pub fn param_as_bool(&self, key: &str, default: bool) -> bool {
        parse_boolean(self.param(key), default)
    }

    /// Whether the flag for a normalized attribute key is on.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.param_as_bool(key, false)
    }

    /// Whether token records carry the computed position.
    pub fn include_position(&self) -> bool {
        self.is_enabled(POSITION_PARAM)
    }

    /// Whether the response document is pretty-printed.
    pub fn pretty(&self) -> bool {
        self.is_enabled(PRETTY_PARAM)
    }
}

/// Fallback corpus and analyzer applied to sub-requests that omit them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeDefaults {
    #[serde(default)]
    pub corpus: Option<String>,
    #[serde(default)]
    pub analyzer: Option<String>,
}

impl AnalyzeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus<S: Into<String>>(mut self, corpus: S) -> Self {
        self.corpus = Some(corpus.into());
        self
    }

    pub fn with_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Fill the fields this value leaves unset from `fallback`.
    pub fn merged_over(&self, fallback: &AnalyzeDefaults) -> AnalyzeDefaults {
        AnalyzeDefaults {
            corpus: self.corpus.clone().or_else(|| fallback.corpus.clone()),
            analyzer: self.analyzer.clone().or_else(|| fallback.analyzer.clone()),
        }
    }
}
