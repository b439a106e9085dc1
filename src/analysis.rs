//! Text analysis module.
//!
//! Analyzers (tokenizer + filters) produce tokens; the [`stream`] protocol
//! and [`attribute`] reflection expose them to consumers that do not know
//! ahead of time which attributes a pipeline carries.

pub mod analyzer;
pub mod attribute;
pub mod stream;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
