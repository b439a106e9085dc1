//! # analyze-api
//!
//! Batch text analysis: run named texts through named analyzers and inspect
//! the resulting tokens with their positions and attributes.
//!
//! ## Features
//!
//! - Named batches, answered in request order
//! - Global and corpus-scoped analyzer registries
//! - Position accumulation across stacked and removed tokens
//! - Caller-selected token attributes, discovered by reflection
//! - Guaranteed token stream release on every exit path
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use analyze_api::prelude::*;
//!
//! let processor = BatchProcessor::new(Arc::new(Analyzers::with_builtins().unwrap()));
//! let options = OutputOptions::new().enable("position").enable("type");
//! let response = processor
//!     .process(
//!         br#"{"q": {"analyzer": "standard", "text": "The 3 bears"}}"#,
//!         &AnalyzeDefaults::new(),
//!         &options,
//!     )
//!     .unwrap();
//!
//! let tokens = response.get("q").unwrap();
//! assert_eq!(tokens[0].term, "3");
//! assert_eq!(tokens[0].position, Some(2));
//! assert_eq!(tokens[0].attribute("type").unwrap(), "<NUM>");
//! ```

pub mod analysis;
pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;

pub mod prelude {
    pub use crate::analysis::analyzer::Analyzer;
    pub use crate::analysis::stream::TokenStream;
    pub use crate::analyze::{
        AnalyzeBatchRequest, AnalyzeBatchResponse, AnalyzeDefaults, AnalyzeSpec, AnalyzerResolver,
        Analyzers, BatchProcessor, OutputOptions, TokenRecord,
    };
    pub use crate::config::AnalyzeConfig;
    pub use crate::error::{AnalyzeError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
