//! Output reporters for survey results
//!
//! - `jsonl` - per-reconciler records, one JSON object per line
//! - `summary` - aggregate statistics over a set of records
//! - `text` - human summary for the terminal
//! - `json` - machine-readable summary

pub mod jsonl;
mod json;
pub mod summary;
mod text;

pub use jsonl::{load_results, JsonlWriter};
pub use summary::Summary;

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported summary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a summary in the format named by `format`
pub fn report(summary: &Summary, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(summary, fmt)
}

pub fn report_with_format(summary: &Summary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(summary),
        OutputFormat::Json => json::render(summary),
    }
}
