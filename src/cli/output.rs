//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::analyze::resolver::{AnalyzerSource, Analyzers};
use crate::cli::args::OutputFormat;
use crate::error::{AnalyzeError, Result};

/// Configured analyzer names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerListing {
    pub global: Vec<String>,
    /// Names each corpus declares itself; other names fall back to `global`.
    pub corpora: BTreeMap<String, Vec<String>>,
}

impl AnalyzerListing {
    pub fn from_analyzers(analyzers: &Analyzers) -> Self {
        let corpora = analyzers
            .corpora()
            .names()
            .into_iter()
            .filter_map(|name| {
                let scope = analyzers.corpora().lookup_scope(&name)?;
                Some((name, scope.own_names()))
            })
            .collect();

        AnalyzerListing {
            global: analyzers.global().names(),
            corpora,
        }
    }
}

/// Render a value as JSON.
pub fn to_json_string<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Render the failure document for `error`.
pub fn render_failure(error: &AnalyzeError, pretty: bool) -> Result<String> {
    to_json_string(&error.to_envelope(), pretty)
}

/// Write an analyzer listing in the requested format.
pub fn output_listing<W: Write>(
    out: &mut W,
    listing: &AnalyzerListing,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", to_json_string(listing, pretty)?)?,
        OutputFormat::Human => output_listing_human(out, listing)?,
    }
    Ok(())
}

fn output_listing_human<W: Write>(out: &mut W, listing: &AnalyzerListing) -> Result<()> {
    writeln!(out, "Global analyzers:")?;
    for name in &listing.global {
        writeln!(out, "  {name}")?;
    }

    if listing.corpora.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Corpora:")?;
    for (corpus, names) in &listing.corpora {
        if names.is_empty() {
            writeln!(out, "  {corpus}: (global analyzers only)")?;
        } else {
            writeln!(out, "  {corpus}: {}", names.join(", "))?;
        }
    }
    Ok(())
}
