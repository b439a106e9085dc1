//! Analyzer resolution.
//!
//! A sub-request names an analyzer and, optionally, a corpus. Without a corpus
//! the name is looked up in the global [`AnalyzerRegistry`]. With one, the
//! corpus's own [`CorpusAnalyzers`] scope is consulted first and falls back to
//! the global registry, so a corpus only declares the analyzers it overrides.
//!
//! Every call performs a fresh lookup; nothing is cached per sub-request.
//!
//! # Examples
//!
//! ```
//! use analyze_api::analyze::resolver::{AnalyzerResolver, Analyzers};
//!
//! let analyzers = Analyzers::with_builtins().unwrap();
//! let analyzer = analyzers.resolve(None, "standard").unwrap();
//! assert_eq!(analyzer.name(), "standard");
//!
//! assert!(analyzers.resolve(Some("products"), "standard").is_err());
//! ```

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::analyzer::whitespace::WhitespaceAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{AnalyzeError, ResolutionError, Result};

/// Handle to a resolved tokenization pipeline.
pub type ResolvedAnalyzer = Arc<dyn Analyzer>;

/// Anything that can hand out analyzers by name.
pub trait AnalyzerSource: Send + Sync {
    /// Look up an analyzer by name.
    fn analyzer(&self, name: &str) -> Option<ResolvedAnalyzer>;

    /// Names this source can resolve, sorted.
    fn names(&self) -> Vec<String>;
}

/// Resolves `(corpus, analyzer)` pairs to pipelines.
pub trait AnalyzerResolver: Send + Sync {
    fn resolve(
        &self,
        corpus: Option<&str>,
        analyzer: &str,
    ) -> std::result::Result<ResolvedAnalyzer, ResolutionError>;
}

/// The global analyzer registry.
#[derive(Default)]
pub struct AnalyzerRegistry {
    analyzers: RwLock<AHashMap<String, ResolvedAnalyzer>>,
}

impl AnalyzerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `standard`, `simple`, `whitespace` and
    /// `keyword`.
    pub fn with_builtins() -> Result<Self> {
        let registry = Self::new();
        registry.register("standard", Arc::new(StandardAnalyzer::new()?));
        // runs of letters, lowercased
        let simple = PipelineAnalyzer::new(Arc::new(RegexTokenizer::with_pattern(r"\p{L}+")?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("simple");
        registry.register("simple", Arc::new(simple));
        registry.register("whitespace", Arc::new(WhitespaceAnalyzer::new()));
        registry.register("keyword", Arc::new(KeywordAnalyzer::new()));
        Ok(registry)
    }

    /// Register an analyzer, replacing any previous one with the same name.
    pub fn register<S: Into<String>>(&self, name: S, analyzer: ResolvedAnalyzer) {
        self.analyzers.write().insert(name.into(), analyzer);
    }

    /// Register `alias` as another name for the analyzer `target`.
    pub fn alias(&self, alias: &str, target: &str) -> Result<()> {
        let analyzer = self.analyzer(target).ok_or_else(|| {
            AnalyzeError::invalid_config(format!(
                "analyzer alias [{alias}] refers to unknown analyzer [{target}]"
            ))
        })?;
        self.register(alias, analyzer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.analyzers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.read().is_empty()
    }
}

impl AnalyzerSource for AnalyzerRegistry {
    fn analyzer(&self, name: &str) -> Option<ResolvedAnalyzer> {
        self.analyzers.read().get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.analyzers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Analyzers declared by one corpus, backed by the global registry.
pub struct CorpusAnalyzers {
    name: String,
    analyzers: AHashMap<String, ResolvedAnalyzer>,
    global: Arc<AnalyzerRegistry>,
}

impl CorpusAnalyzers {
    pub fn new<S: Into<String>>(name: S, global: Arc<AnalyzerRegistry>) -> Self {
        CorpusAnalyzers {
            name: name.into(),
            analyzers: AHashMap::new(),
            global,
        }
    }

    /// Bind `name` within this corpus to an analyzer instance.
    pub fn with_analyzer<S: Into<String>>(mut self, name: S, analyzer: ResolvedAnalyzer) -> Self {
        self.analyzers.insert(name.into(), analyzer);
        self
    }

    /// Bind `name` within this corpus to the global analyzer `target`.
    pub fn with_global(self, name: &str, target: &str) -> Result<Self> {
        let analyzer = self.global.analyzer(target).ok_or_else(|| {
            AnalyzeError::invalid_config(format!(
                "analyzer [{name}] of corpus [{}] refers to unknown analyzer [{target}]",
                self.name
            ))
        })?;
        Ok(self.with_analyzer(name, analyzer))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names declared by the corpus itself, without the global fallback.
    pub fn own_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.analyzers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl AnalyzerSource for CorpusAnalyzers {
    fn analyzer(&self, name: &str) -> Option<ResolvedAnalyzer> {
        self.analyzers
            .get(name)
            .cloned()
            .or_else(|| self.global.analyzer(name))
    }

    fn names(&self) -> Vec<String> {
        let mut names = self.global.names();
        names.extend(self.analyzers.keys().cloned());
        names.sort();
        names.dedup();
        names
    }
}

/// Registry of corpus scopes.
#[derive(Default)]
pub struct CorpusRegistry {
    corpora: RwLock<AHashMap<String, Arc<CorpusAnalyzers>>>,
}

impl CorpusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, corpus: CorpusAnalyzers) {
        self.corpora
            .write()
            .insert(corpus.name().to_string(), Arc::new(corpus));
    }

    /// Find the scope of a corpus.
    pub fn lookup_scope(&self, name: &str) -> Option<Arc<CorpusAnalyzers>> {
        self.corpora.read().get(name).cloned()
    }

    /// Corpus names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.corpora.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Global and corpus-scoped analyzers behind one [`AnalyzerResolver`].
pub struct Analyzers {
    global: Arc<AnalyzerRegistry>,
    corpora: CorpusRegistry,
}

impl Analyzers {
    pub fn new(global: Arc<AnalyzerRegistry>) -> Self {
        Analyzers {
            global,
            corpora: CorpusRegistry::new(),
        }
    }

    /// Built-in global analyzers and no corpora.
    pub fn with_builtins() -> Result<Self> {
        Ok(Self::new(Arc::new(AnalyzerRegistry::with_builtins()?)))
    }

    pub fn global(&self) -> &Arc<AnalyzerRegistry> {
        &self.global
    }

    pub fn corpora(&self) -> &CorpusRegistry {
        &self.corpora
    }

    /// Start a new corpus scope backed by this instance's global registry.
    pub fn corpus<S: Into<String>>(&self, name: S) -> CorpusAnalyzers {
        CorpusAnalyzers::new(name, self.global.clone())
    }

    pub fn register_corpus(&self, corpus: CorpusAnalyzers) {
        self.corpora.register(corpus);
    }
}

impl AnalyzerResolver for Analyzers {
    fn resolve(
        &self,
        corpus: Option<&str>,
        analyzer: &str,
    ) -> std::result::Result<ResolvedAnalyzer, ResolutionError> {
        let found = match corpus {
            Some(corpus) => {
                let scope = self
                    .corpora
                    .lookup_scope(corpus)
                    .ok_or_else(|| ResolutionError::UnknownCorpus(corpus.to_string()))?;
                scope.analyzer(analyzer)
            }
            None => self.global.analyzer(analyzer),
        };

        let resolved = found.ok_or_else(|| ResolutionError::UnknownAnalyzer {
            corpus: corpus.map(str::to_string),
            analyzer: analyzer.to_string(),
        })?;
        debug!(
            "Resolved analyzer [{analyzer}] in {} to [{}]",
            corpus.map_or_else(|| "global scope".to_string(), |c| format!("corpus [{c}]")),
            resolved.name()
        );
        Ok(resolved)
    }
}
