//! Configuration for the analyzer registries.
//!
//! The configuration is a JSON document:
//!
//! ```json
//! {
//!   "defaults": { "analyzer": "standard" },
//!   "analyzers": { "english": "standard" },
//!   "corpora": {
//!     "products": { "analyzers": { "title": "whitespace", "standard": "keyword" } }
//!   }
//! }
//! ```
//!
//! `analyzers` adds global aliases for built-in analyzers. Each corpus maps
//! its own analyzer names to global ones; names a corpus does not declare
//! resolve globally. Every section is optional.
//!
//! # Example
//!
//! ```
//! use analyze_api::analyze::resolver::{AnalyzerResolver, Analyzers};
//! use analyze_api::config::AnalyzeConfig;
//!
//! let config = AnalyzeConfig::from_json(
//!     r#"{"corpora": {"products": {"analyzers": {"title": "whitespace"}}}}"#,
//! )
//! .unwrap();
//! let analyzers = Analyzers::from_config(&config).unwrap();
//!
//! let analyzer = analyzers.resolve(Some("products"), "title").unwrap();
//! assert_eq!(analyzer.name(), "whitespace");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analyze::options::AnalyzeDefaults;
use crate::analyze::resolver::Analyzers;
use crate::error::{AnalyzeError, Result};

/// Registry and default configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeConfig {
    /// Host-level defaults for sub-requests.
    #[serde(default)]
    pub defaults: AnalyzeDefaults,

    /// Global aliases: alias name to built-in analyzer name.
    #[serde(default)]
    pub analyzers: BTreeMap<String, String>,

    /// Corpus scopes by corpus name.
    #[serde(default)]
    pub corpora: BTreeMap<String, CorpusConfig>,
}

/// Analyzers declared by one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Corpus-local name to global analyzer name.
    #[serde(default)]
    pub analyzers: BTreeMap<String, String>,
}

impl AnalyzeConfig {
    /// Read a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loading configuration from {}", path.display());
        Self::from_json(&content)
    }

    /// Parse a configuration document.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AnalyzeError::invalid_config(format!("invalid configuration: {e}")))
    }
}

impl Analyzers {
    /// Build the built-in registry extended by `config`.
    pub fn from_config(config: &AnalyzeConfig) -> Result<Self> {
        let analyzers = Analyzers::with_builtins()?;

        for (alias, target) in &config.analyzers {
            analyzers.global().alias(alias, target)?;
        }

        for (name, corpus_config) in &config.corpora {
            let mut corpus = analyzers.corpus(name.as_str());
            for (local, target) in &corpus_config.analyzers {
                corpus = corpus.with_global(local, target)?;
            }
            analyzers.register_corpus(corpus);
        }

        debug!(
            "Configured {} global analyzers and {} corpora",
            analyzers.global().len(),
            config.corpora.len()
        );
        Ok(analyzers)
    }
}
