//! Comparison table across algorithms and thresholds.

use std::fmt::Write as _;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::align::AlgorithmId;
use crate::metrics::Metrics;

/// One ranked configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub algorithm: AlgorithmId,
    pub threshold: f64,
    pub precision_body: f64,
    pub recall_body: f64,
    pub f1_body: f64,
    pub precision_footnote: f64,
    pub recall_footnote: f64,
    pub f1_footnote: f64,
    pub macro_f1: f64,
}

impl ComparisonRow {
    pub fn new(algorithm: AlgorithmId, threshold: f64, metrics: &Metrics) -> Self {
        Self {
            algorithm,
            threshold,
            precision_body: metrics.body.precision,
            recall_body: metrics.body.recall,
            f1_body: metrics.body.f1,
            precision_footnote: metrics.footnote.precision,
            recall_footnote: metrics.footnote.recall,
            f1_footnote: metrics.footnote.f1,
            macro_f1: metrics.macro_f1,
        }
    }
}

/// Rows ranked by macro F1, best first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Ranks rows by macro F1 descending; ties by algorithm order, then
    /// threshold ascending.
    pub fn ranked(mut rows: Vec<ComparisonRow>) -> Self {
        rows.sort_by_key(|row| {
            (
                std::cmp::Reverse(OrderedFloat(row.macro_f1)),
                row.algorithm,
                OrderedFloat(row.threshold),
            )
        });
        Self { rows }
    }

    pub fn best(&self) -> Option<&ComparisonRow> {
        self.rows.first()
    }

    /// Fixed-width text rendering, one row per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<4} {:<9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "rank",
            "algorithm",
            "threshold",
            "p_body",
            "r_body",
            "f1_body",
            "p_foot",
            "r_foot",
            "f1_foot",
            "macro_f1"
        );
        for (rank, row) in self.rows.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4} {:<9} {:>9.2} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
                rank + 1,
                row.algorithm.as_str(),
                row.threshold,
                row.precision_body,
                row.recall_body,
                row.f1_body,
                row.precision_footnote,
                row.recall_footnote,
                row.f1_footnote,
                row.macro_f1
            );
        }
        out
    }
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    pub id: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: Vec<FailedDocument>,
    pub table: ComparisonTable,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
