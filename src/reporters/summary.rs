//! Aggregate statistics over a set of results

use crate::models::{AnalysisResult, Classification, SignalKind};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_reconcilers: usize,
    pub by_classification: BTreeMap<Classification, usize>,
    pub by_repo: BTreeMap<String, usize>,
    pub signal_frequency: BTreeMap<SignalKind, usize>,
    pub average_score: f64,
    /// Highest scores first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_sotw: Vec<AnalysisResult>,
    /// Lowest scores first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_edge: Vec<AnalysisResult>,
}

impl Summary {
    /// Summarise `results`, keeping `top` entries in each top list
    pub fn generate(results: &[AnalysisResult], top: usize) -> Self {
        let mut by_classification = BTreeMap::new();
        let mut by_repo = BTreeMap::new();
        let mut signal_frequency = BTreeMap::new();
        let mut total_score: i64 = 0;

        for result in results {
            *by_classification.entry(result.classification).or_insert(0) += 1;
            *by_repo.entry(result.repo.clone()).or_insert(0) += 1;
            total_score += i64::from(result.score);
            for signal in &result.signals {
                *signal_frequency.entry(signal.kind).or_insert(0) += 1;
            }
        }

        let average_score = if results.is_empty() {
            0.0
        } else {
            total_score as f64 / results.len() as f64
        };

        Self {
            total_reconcilers: results.len(),
            by_classification,
            by_repo,
            signal_frequency,
            average_score,
            top_sotw: top_by_score(results, top, true),
            top_edge: top_by_score(results, top, false),
        }
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.by_classification
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }

    /// Percentage of all results carrying `classification`
    pub fn percentage(&self, classification: Classification) -> f64 {
        if self.total_reconcilers == 0 {
            return 0.0;
        }
        100.0 * self.count(classification) as f64 / self.total_reconcilers as f64
    }

    /// Signal kinds by descending frequency; ties keep kind order
    pub fn signals_by_frequency(&self) -> Vec<(SignalKind, usize)> {
        let mut freqs: Vec<_> = self
            .signal_frequency
            .iter()
            .map(|(kind, count)| (*kind, *count))
            .collect();
        freqs.sort_by(|a, b| b.1.cmp(&a.1));
        freqs
    }
}

/// Stable: equal scores keep their input order
fn top_by_score(results: &[AnalysisResult], n: usize, highest: bool) -> Vec<AnalysisResult> {
    let mut sorted: Vec<&AnalysisResult> = results.iter().collect();
    if highest {
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
    } else {
        sorted.sort_by_key(|r| r.score);
    }
    sorted.into_iter().take(n).cloned().collect()
}
