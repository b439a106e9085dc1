//! The batch analyze API.
//!
//! Data flows top-down through four layers:
//!
//! ```text
//! BatchProcessor → AnalyzerResolver → consume() → project()
//! ```
//!
//! - [`batch`] parses the request document, applies defaults and assembles
//!   the response in request order.
//! - [`resolver`] maps a corpus scope and analyzer name to a pipeline.
//! - [`consumer`] drives one token stream and accumulates positions.
//! - [`projector`] decides which reflected attributes are emitted.
//! - [`options`] holds the caller's output flags and defaults.

pub mod batch;
pub mod consumer;
pub mod options;
pub mod projector;
pub mod resolver;

pub use batch::{AnalyzeBatchRequest, AnalyzeBatchResponse, AnalyzeSpec, BatchProcessor, ResolvedSpec};
pub use consumer::{TokenRecord, consume};
pub use options::{AnalyzeDefaults, OutputOptions};
pub use resolver::{AnalyzerResolver, AnalyzerSource, Analyzers, ResolvedAnalyzer};
