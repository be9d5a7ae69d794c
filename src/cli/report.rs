//! `report` command: summarize a JSONL results file

use anyhow::{Context, Result};
use controller_survey::reporters::{load_results, report, Summary};
use std::path::Path;
use tracing::debug;

pub fn run(input: &Path, top: usize, format: &str) -> Result<()> {
    let results = load_results(input)
        .with_context(|| format!("Failed to load results from {}", input.display()))?;
    debug!("Loaded {} records from {}", results.len(), input.display());

    let summary = Summary::generate(&results, top);
    print!("{}", report(&summary, format)?);
    Ok(())
}
