//! Command implementations for the analyze-api CLI.

use std::fs;
use std::io::{self, Read, Write};
use std::sync::Arc;

use log::{debug, info};

use crate::analyze::batch::BatchProcessor;
use crate::analyze::resolver::Analyzers;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AnalyzeConfig;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: AnalyzeApiArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => run_analyze(analyze_args, &args),
        Command::Analyzers(list_args) => list_analyzers(list_args, &args),
    }
}

/// Load the configuration named on the command line, or the empty one.
pub fn load_config(cli_args: &AnalyzeApiArgs) -> Result<AnalyzeConfig> {
    match &cli_args.config {
        Some(path) => {
            info!("Using configuration {}", path.display());
            AnalyzeConfig::from_file(path)
        }
        None => Ok(AnalyzeConfig::default()),
    }
}

/// Build a batch processor for `config`.
pub fn build_processor(config: &AnalyzeConfig) -> Result<BatchProcessor> {
    let analyzers = Analyzers::from_config(config)?;
    Ok(BatchProcessor::new(Arc::new(analyzers)).with_defaults(config.defaults.clone()))
}

/// Run one batch and render the response document.
pub fn analyze_document(processor: &BatchProcessor, args: &AnalyzeArgs, body: &[u8]) -> Result<String> {
    let options = args.output_options();
    let response = processor.process(body, &args.defaults(), &options)?;
    debug!("Analyzed {} requests", response.len());
    response.to_json(options.pretty())
}

fn read_body(args: &AnalyzeArgs) -> Result<Vec<u8>> {
    match &args.input {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut body = Vec::new();
            io::stdin().read_to_end(&mut body)?;
            Ok(body)
        }
    }
}

/// Analyze a request document. Failures print the error envelope before
/// they are returned.
fn run_analyze(args: &AnalyzeArgs, cli_args: &AnalyzeApiArgs) -> Result<()> {
    let pretty = args.output_options().pretty();
    let result = load_config(cli_args)
        .and_then(|config| build_processor(&config))
        .and_then(|processor| {
            let body = read_body(args)?;
            analyze_document(&processor, args, &body)
        });

    let mut stdout = io::stdout().lock();
    match result {
        Ok(json) => {
            writeln!(stdout, "{json}")?;
            Ok(())
        }
        Err(e) => {
            writeln!(stdout, "{}", render_failure(&e, pretty)?)?;
            Err(e)
        }
    }
}

/// List the global analyzers and every corpus scope.
fn list_analyzers(args: &AnalyzersArgs, cli_args: &AnalyzeApiArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    let analyzers = Analyzers::from_config(&config)?;
    let listing = AnalyzerListing::from_analyzers(&analyzers);

    let mut stdout = io::stdout().lock();
    output_listing(&mut stdout, &listing, args.output_format, args.pretty)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::AnalyzeError;

    fn analyze_args(extra: &[&str]) -> (AnalyzeApiArgs, AnalyzeArgs) {
        let mut argv = vec!["analyze-api", "analyze"];
        argv.extend_from_slice(extra);
        let args = AnalyzeApiArgs::try_parse_from(argv).unwrap();
        let Command::Analyze(analyze_args) = args.command.clone() else {
            panic!("Expected Analyze command");
        };
        (args, analyze_args)
    }

    #[test]
    fn test_analyze_document() {
        let (cli_args, args) = analyze_args(&["--analyzer", "whitespace", "-p", "position"]);
        let processor = build_processor(&load_config(&cli_args).unwrap()).unwrap();

        let json = analyze_document(&processor, &args, br#"{"q": {"text": "Hello World"}}"#).unwrap();
        assert_eq!(
            json,
            r#"{"q":[{"term":"Hello","position":1},{"term":"World","position":2}]}"#
        );
    }

    #[test]
    fn test_analyze_with_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"defaults": {{"corpus": "products", "analyzer": "title"}},
                "corpora": {{"products": {{"analyzers": {{"title": "keyword"}}}}}}}}"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let (cli_args, args) = analyze_args(&["--config", &path]);
        let processor = build_processor(&load_config(&cli_args).unwrap()).unwrap();

        let json = analyze_document(&processor, &args, br#"{"q": {"text": "Red Shoes"}}"#).unwrap();
        assert_eq!(json, r#"{"q":[{"term":"Red Shoes"}]}"#);
    }

    #[test]
    fn test_analyze_failure() {
        let (cli_args, args) = analyze_args(&[]);
        let processor = build_processor(&load_config(&cli_args).unwrap()).unwrap();

        let err = analyze_document(&processor, &args, br#"{"q": {"text": "x"}}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::Request(_)));
        assert_eq!(err.status(), 400);
    }
}
