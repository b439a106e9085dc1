//! Batch request processing.
//!
//! A batch is a JSON object mapping request names to sub-requests:
//!
//! ```json
//! {
//!   "title": { "corpus": "products", "analyzer": "standard", "text": "Quick Brown Fox" },
//!   "body":  { "text": "jumps over the lazy dog" }
//! }
//! ```
//!
//! Each sub-request is completed from the caller's defaults, resolved to an
//! analyzer and consumed, one at a time and in input order. The response maps
//! the same names, in the same order, to token lists. Any failure rejects the
//! whole batch; no partial response is produced.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use analyze_api::analyze::batch::BatchProcessor;
//! use analyze_api::analyze::options::{AnalyzeDefaults, OutputOptions};
//! use analyze_api::analyze::resolver::Analyzers;
//!
//! let processor = BatchProcessor::new(Arc::new(Analyzers::with_builtins().unwrap()));
//! let defaults = AnalyzeDefaults::new().with_analyzer("standard");
//! let options = OutputOptions::new().enable("position");
//!
//! let response = processor
//!     .process(br#"{"greeting": {"text": "Hello World"}}"#, &defaults, &options)
//!     .unwrap();
//!
//! assert_eq!(
//!     response.to_json(false).unwrap(),
//!     r#"{"greeting":[{"term":"hello","position":1},{"term":"world","position":2}]}"#
//! );
//! ```

use std::sync::Arc;

use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::analyze::consumer::TokenRecord;
use crate::analyze::consumer::consume;
use crate::analyze::options::{AnalyzeDefaults, OutputOptions};
use crate::analyze::resolver::AnalyzerResolver;
use crate::error::{AnalyzeError, RequestError, ResolutionError, Result};

/// One sub-request as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyzeSpec {
    #[serde(default, alias = "index", skip_serializing_if = "Option::is_none")]
    pub corpus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AnalyzeSpec {
    pub fn new<S: Into<String>>(text: S) -> Self {
        AnalyzeSpec {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_corpus<S: Into<String>>(mut self, corpus: S) -> Self {
        self.corpus = Some(corpus.into());
        self
    }

    pub fn with_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Fill missing fields from `defaults` and check that the result is
    /// complete.
    pub fn resolve(&self, name: &str, defaults: &AnalyzeDefaults) -> std::result::Result<ResolvedSpec, RequestError> {
        let own = AnalyzeDefaults {
            corpus: self.corpus.clone(),
            analyzer: self.analyzer.clone(),
        };
        let merged = own.merged_over(defaults);

        let analyzer = merged.analyzer.ok_or_else(|| RequestError::MissingAnalyzer {
            name: name.to_string(),
        })?;
        let text = self.text.clone().ok_or_else(|| RequestError::MissingText {
            name: name.to_string(),
        })?;

        Ok(ResolvedSpec {
            name: name.to_string(),
            corpus: merged.corpus,
            analyzer,
            text,
        })
    }
}

/// A sub-request with every default applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSpec {
    pub name: String,
    pub corpus: Option<String>,
    pub analyzer: String,
    pub text: String,
}

/// The parsed batch: named sub-requests in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzeBatchRequest {
    entries: Vec<(String, AnalyzeSpec)>,
}

impl AnalyzeBatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-request. A repeated name replaces the earlier spec in
    /// place.
    pub fn with_request<S: Into<String>>(mut self, name: S, spec: AnalyzeSpec) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name, spec)),
        }
        self
    }

    /// Parse a request body.
    pub fn parse(body: &[u8]) -> std::result::Result<Self, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RequestError::EmptyBody);
        }

        let document: Value = serde_json::from_slice(body)
            .map_err(|e| RequestError::MalformedBody(e.to_string()))?;
        let Value::Object(object) = document else {
            return Err(RequestError::MalformedBody(format!(
                "expected an object of named requests, found {}",
                json_kind(&document)
            )));
        };

        let mut entries = Vec::with_capacity(object.len());
        for (name, value) in object {
            if !value.is_object() {
                return Err(RequestError::InvalidRequest {
                    reason: format!("expected an object, found {}", json_kind(&value)),
                    name,
                });
            }
            match serde_json::from_value::<AnalyzeSpec>(value) {
                Ok(spec) => entries.push((name, spec)),
                Err(e) => {
                    return Err(RequestError::InvalidRequest {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(AnalyzeBatchRequest { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnalyzeSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Token lists keyed by request name, in request order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyzeBatchResponse {
    entries: Vec<(String, Vec<TokenRecord>)>,
}

impl AnalyzeBatchResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, name: S, tokens: Vec<TokenRecord>) {
        self.entries.push((name.into(), tokens));
    }

    /// Tokens of the named sub-request.
    pub fn get(&self, name: &str) -> Option<&[TokenRecord]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tokens)| tokens.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the response document.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl Serialize for AnalyzeBatchResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, tokens) in &self.entries {
            map.serialize_entry(name, tokens)?;
        }
        map.end()
    }
}

/// Runs batches against an [`AnalyzerResolver`].
pub struct BatchProcessor {
    resolver: Arc<dyn AnalyzerResolver>,
    defaults: AnalyzeDefaults,
}

impl BatchProcessor {
    pub fn new(resolver: Arc<dyn AnalyzerResolver>) -> Self {
        BatchProcessor {
            resolver,
            defaults: AnalyzeDefaults::default(),
        }
    }

    /// Host-level defaults, used when neither the sub-request nor the caller
    /// supplies a value.
    pub fn with_defaults(mut self, defaults: AnalyzeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &AnalyzeDefaults {
        &self.defaults
    }

    /// Parse and process a raw request body.
    pub fn process(
        &self,
        body: &[u8],
        defaults: &AnalyzeDefaults,
        options: &OutputOptions,
    ) -> Result<AnalyzeBatchResponse> {
        let request = AnalyzeBatchRequest::parse(body)?;
        self.process_request(&request, defaults, options)
    }

    /// Process an already parsed batch.
    pub fn process_request(
        &self,
        request: &AnalyzeBatchRequest,
        defaults: &AnalyzeDefaults,
        options: &OutputOptions,
    ) -> Result<AnalyzeBatchResponse> {
        let defaults = defaults.merged_over(&self.defaults);
        let mut response = AnalyzeBatchResponse::new();

        for (name, spec) in request.iter() {
            let resolved = spec.resolve(name, &defaults)?;
            debug!(
                "Analyzing request [{name}] with analyzer [{}]{}",
                resolved.analyzer,
                resolved
                    .corpus
                    .as_ref()
                    .map(|c| format!(" of corpus [{c}]"))
                    .unwrap_or_default()
            );

            let analyzer = self
                .resolver
                .resolve(resolved.corpus.as_deref(), &resolved.analyzer)
                .map_err(|e| match e {
                    ResolutionError::UnknownCorpus(corpus) => {
                        AnalyzeError::from(RequestError::MissingCorpus {
                            name: name.to_string(),
                            corpus,
                        })
                    }
                    other => AnalyzeError::resolution(name, other),
                })?;

            let tokens = consume(analyzer.as_ref(), &resolved.text, options)?;
            response.push(name, tokens);
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::resolver::Analyzers;

    fn processor() -> BatchProcessor {
        let analyzers = Analyzers::with_builtins().unwrap();
        let products = analyzers
            .corpus("products")
            .with_global("title", "whitespace")
            .unwrap();
        analyzers.register_corpus(products);
        BatchProcessor::new(Arc::new(analyzers))
    }

    #[test]
    fn test_parse_preserves_order() {
        let request = AnalyzeBatchRequest::parse(
            br#"{"b": {"text": "x"}, "a": {"text": "y", "index": "products"}}"#,
        )
        .unwrap();

        let names: Vec<&str> = request.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(
            request.iter().nth(1).unwrap().1.corpus.as_deref(),
            Some("products")
        );
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(AnalyzeBatchRequest::parse(b""), Err(RequestError::EmptyBody));
        assert_eq!(AnalyzeBatchRequest::parse(b" \n "), Err(RequestError::EmptyBody));
        assert!(matches!(
            AnalyzeBatchRequest::parse(b"{not json"),
            Err(RequestError::MalformedBody(_))
        ));
        assert!(matches!(
            AnalyzeBatchRequest::parse(b"[1, 2]"),
            Err(RequestError::MalformedBody(_))
        ));
        assert!(matches!(
            AnalyzeBatchRequest::parse(br#"{"q": "text"}"#),
            Err(RequestError::InvalidRequest { name, .. }) if name == "q"
        ));
        assert!(matches!(
            AnalyzeBatchRequest::parse(br#"{"q": {"text": 7}}"#),
            Err(RequestError::InvalidRequest { name, .. }) if name == "q"
        ));
    }

    #[test]
    fn test_spec_default_resolution() {
        let defaults = AnalyzeDefaults::new()
            .with_corpus("products")
            .with_analyzer("standard");

        let resolved = AnalyzeSpec::new("hello world").resolve("q", &defaults).unwrap();
        assert_eq!(resolved.corpus.as_deref(), Some("products"));
        assert_eq!(resolved.analyzer, "standard");
        assert_eq!(resolved.text, "hello world");

        let resolved = AnalyzeSpec::new("hello")
            .with_analyzer("keyword")
            .resolve("q", &defaults)
            .unwrap();
        assert_eq!(resolved.analyzer, "keyword");
    }

    #[test]
    fn test_spec_missing_fields() {
        let spec = AnalyzeSpec {
            corpus: Some("products".to_string()),
            ..Default::default()
        };
        assert_eq!(
            spec.resolve("q", &AnalyzeDefaults::new()),
            Err(RequestError::MissingAnalyzer {
                name: "q".to_string()
            })
        );

        let spec = AnalyzeSpec::default().with_analyzer("standard");
        assert_eq!(
            spec.resolve("q", &AnalyzeDefaults::new()),
            Err(RequestError::MissingText {
                name: "q".to_string()
            })
        );
    }

    #[test]
    fn test_process_with_corpus() {
        let response = processor()
            .process(
                br#"{"t": {"corpus": "products", "analyzer": "title", "text": "Red Shoes"}}"#,
                &AnalyzeDefaults::new(),
                &OutputOptions::new(),
            )
            .unwrap();

        let terms: Vec<&str> = response
            .get("t")
            .unwrap()
            .iter()
            .map(|r| r.term.as_str())
            .collect();
        assert_eq!(terms, vec!["Red", "Shoes"]);
    }

    #[test]
    fn test_unknown_corpus_is_missing_corpus() {
        let err = processor()
            .process(
                br#"{"q": {"corpus": "orders", "analyzer": "standard", "text": "x"}}"#,
                &AnalyzeDefaults::new(),
                &OutputOptions::new(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            AnalyzeError::Request(RequestError::MissingCorpus { ref name, ref corpus })
                if name == "q" && corpus == "orders"
        ));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_unknown_analyzer_names_request() {
        let err = processor()
            .process(
                br#"{"q": {"analyzer": "fancy", "text": "x"}}"#,
                &AnalyzeDefaults::new(),
                &OutputOptions::new(),
            )
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Resolution error in request [q]: unknown analyzer [fancy]"
        );
    }

    #[test]
    fn test_host_defaults_lose_to_caller_defaults() {
        let processor = processor().with_defaults(AnalyzeDefaults::new().with_analyzer("keyword"));

        let response = processor
            .process(br#"{"q": {"text": "Big Deal"}}"#, &AnalyzeDefaults::new(), &OutputOptions::new())
            .unwrap();
        assert_eq!(response.get("q").unwrap()[0].term, "Big Deal");

        let response = processor
            .process(
                br#"{"q": {"text": "Big Deal"}}"#,
                &AnalyzeDefaults::new().with_analyzer("standard"),
                &OutputOptions::new(),
            )
            .unwrap();
        assert_eq!(response.get("q").unwrap()[0].term, "big");
    }

    #[test]
    fn test_response_pretty_output() {
        let mut response = AnalyzeBatchResponse::new();
        response.push("q", vec![TokenRecord::new("x")]);

        assert_eq!(response.to_json(false).unwrap(), r#"{"q":[{"term":"x"}]}"#);
        assert!(response.to_json(true).unwrap().contains("\n"));
        assert_eq!(response.names(), vec!["q"]);
    }

    #[test]
    fn test_builder_replaces_repeated_name() {
        let request = AnalyzeBatchRequest::new()
            .with_request("a", AnalyzeSpec::new("one"))
            .with_request("b", AnalyzeSpec::new("two"))
            .with_request("a", AnalyzeSpec::new("three"));

        let texts: Vec<(&str, Option<&str>)> = request
            .iter()
            .map(|(n, s)| (n, s.text.as_deref()))
            .collect();
        assert_eq!(texts, vec![("a", Some("three")), ("b", Some("two"))]);
    }
}
