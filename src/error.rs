//! Error types for the analyze API.
//!
//! All failures are represented by [`AnalyzeError`]. Faults caused by the
//! caller's input are split out into [`RequestError`] (the batch document is
//! malformed or incomplete) and [`ResolutionError`] (a corpus or analyzer name
//! does not exist). Both reject the whole batch.
//!
//! # Examples
//!
//! ```
//! use analyze_api::error::{AnalyzeError, RequestError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(RequestError::EmptyBody.into())
//! }
//!
//! let err = example_operation().unwrap_err();
//! assert_eq!(err.status(), 400);
//! assert_eq!(err.to_string(), "Request error: request body is empty");
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

/// The main error type for analyze API operations.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Malformed or incomplete batch input
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// A sub-request named an analyzer that could not be resolved
    #[error("Resolution error in request [{request}]: {source}")]
    Resolution {
        request: String,
        #[source]
        source: ResolutionError,
    },

    /// Analysis-related errors (tokenization, filtering, stream protocol)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Caller-input faults in the batch document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("request body is empty")]
    EmptyBody,

    #[error("request body is not a JSON object: {0}")]
    MalformedBody(String),

    #[error("request [{name}] is invalid: {reason}")]
    InvalidRequest { name: String, reason: String },

    #[error("analyzer is not found in request [{name}]")]
    MissingAnalyzer { name: String },

    #[error("text is not found in request [{name}]")]
    MissingText { name: String },

    #[error("corpus [{corpus}] of request [{name}] is missing")]
    MissingCorpus { name: String, corpus: String },
}

/// Lookup failures raised by an analyzer resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("unknown corpus [{0}]")]
    UnknownCorpus(String),

    #[error("unknown analyzer [{analyzer}]{}", corpus_suffix(.corpus))]
    UnknownAnalyzer {
        corpus: Option<String>,
        analyzer: String,
    },
}

fn corpus_suffix(corpus: &Option<String>) -> String {
    corpus
        .as_ref()
        .map(|c| format!(" in corpus [{c}]"))
        .unwrap_or_default()
}

/// Result type alias for operations that may fail with AnalyzeError.
pub type Result<T> = std::result::Result<T, AnalyzeError>;

impl AnalyzeError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        AnalyzeError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        AnalyzeError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AnalyzeError::Other(msg.into())
    }

    /// Attach the failing sub-request name to a resolution error.
    pub fn resolution<S: Into<String>>(request: S, source: ResolutionError) -> Self {
        AnalyzeError::Resolution {
            request: request.into(),
            source,
        }
    }

    /// Whether the error was caused by the caller's input.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            AnalyzeError::Request(_) | AnalyzeError::Resolution { .. }
        )
    }

    /// HTTP-style status code for the failure response.
    pub fn status(&self) -> u16 {
        if self.is_caller_fault() { 400 } else { 500 }
    }

    /// Short machine-readable error type, used in the error envelope.
    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyzeError::Request(_) => "analyze_request_exception",
            AnalyzeError::Resolution { .. } => "analyzer_resolution_exception",
            AnalyzeError::Analysis(_) => "analysis_exception",
            AnalyzeError::Config(_) => "configuration_exception",
            AnalyzeError::Io(_) => "io_exception",
            AnalyzeError::Json(_) => "json_exception",
            AnalyzeError::Other(_) | AnalyzeError::Anyhow(_) => "exception",
        }
    }

    /// Build the structured failure document for this error.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorBody {
                error_type: self.error_type().to_string(),
                reason: self.to_string(),
            },
            status: self.status(),
        }
    }
}

/// Structured failure document: `{"error": {"type", "reason"}, "status"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
    pub status: u16,
}

/// Body of an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub reason: String,
}
