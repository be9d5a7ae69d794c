//! Text (terminal) reporter

use super::summary::Summary;
use crate::models::Classification;
use anyhow::Result;
use console::style;
use std::fmt::Write;

/// Signal kinds listed in the frequency table
const TOP_SIGNAL_KINDS: usize = 10;

fn classification_label(classification: Classification) -> String {
    let label = classification.as_str();
    match classification {
        Classification::EdgeTriggered => style(label).green().to_string(),
        Classification::MostlyEdge => style(label).cyan().to_string(),
        Classification::MostlySotw => style(label).yellow().to_string(),
        Classification::Sotw => style(label).red().to_string(),
    }
}

/// Render a summary for humans
pub fn render(summary: &Summary) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", style("=== Analysis Summary ===").bold())?;
    writeln!(out)?;
    writeln!(out, "Total Reconcilers: {}", summary.total_reconcilers)?;
    writeln!(out, "Average Score: {:.2}", summary.average_score)?;
    writeln!(out)?;

    writeln!(out, "{}", style("Classification Distribution:").bold())?;
    for classification in Classification::ALL {
        writeln!(
            out,
            "  {}: {} ({:.1}%)",
            classification_label(classification),
            summary.count(classification),
            summary.percentage(classification)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", style("Top Signal Types:").bold())?;
    for (kind, count) in summary
        .signals_by_frequency()
        .into_iter()
        .take(TOP_SIGNAL_KINDS)
    {
        writeln!(out, "  {}: {}", kind, count)?;
    }
    writeln!(out)?;

    if !summary.by_repo.is_empty() {
        writeln!(out, "{}", style("Reconcilers per Repository:").bold())?;
        for (repo, count) in &summary.by_repo {
            writeln!(out, "  {}: {}", repo, count)?;
        }
        writeln!(out)?;
    }

    if !summary.top_sotw.is_empty() {
        writeln!(out, "{}", style("Top SoTW Reconcilers:").bold())?;
        for (i, r) in summary.top_sotw.iter().enumerate() {
            writeln!(out, "  {}. {} (score: {})", i + 1, r.id, r.score)?;
        }
        writeln!(out)?;
    }

    if !summary.top_edge.is_empty() {
        writeln!(out, "{}", style("Top Edge-Triggered Reconcilers:").bold())?;
        for (i, r) in summary.top_edge.iter().enumerate() {
            writeln!(out, "  {}. {} (score: {})", i + 1, r.id, r.score)?;
        }
        writeln!(out)?;
    }

    Ok(out)
}
