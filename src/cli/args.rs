//! Command line argument parsing for the analyze-api CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analyze::options::{AnalyzeDefaults, OutputOptions, PRETTY_PARAM};

/// analyze-api - Run batches of named analyze requests against text analyzers
#[derive(Parser, Debug, Clone)]
#[command(name = "analyze-api")]
#[command(about = "Tokenize named batches of text and inspect token attributes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AnalyzeApiArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Analyzer configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true, env = "ANALYZE_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AnalyzeApiArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a batch request document
    Analyze(AnalyzeArgs),

    /// List the configured analyzers
    Analyzers(AnalyzersArgs),
}

/// Arguments for analyzing a batch
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Request document file (reads stdin when omitted)
    #[arg(short, long, value_name = "REQUEST_FILE")]
    pub input: Option<PathBuf>,

    /// Default corpus for sub-requests that name none
    #[arg(long)]
    pub corpus: Option<String>,

    /// Default analyzer for sub-requests that name none
    #[arg(short, long)]
    pub analyzer: Option<String>,

    /// Output flag as key[=value], e.g. position or type=true (repeatable)
    #[arg(short, long = "param", value_name = "KEY[=VALUE]")]
    pub params: Vec<String>,

    /// Pretty-print the response document
    #[arg(long)]
    pub pretty: bool,
}

impl AnalyzeArgs {
    /// Output flags from the repeated `--param` values and `--pretty`.
    pub fn output_options(&self) -> OutputOptions {
        let options =
            OutputOptions::from_params(self.params.iter().map(|p| OutputOptions::parse_param(p)));
        if self.pretty {
            options.enable(PRETTY_PARAM)
        } else {
            options
        }
    }

    /// Caller-level defaults.
    pub fn defaults(&self) -> AnalyzeDefaults {
        AnalyzeDefaults {
            corpus: self.corpus.clone(),
            analyzer: self.analyzer.clone(),
        }
    }
}

/// Arguments for listing analyzers
#[derive(Parser, Debug, Clone)]
pub struct AnalyzersArgs {
    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
