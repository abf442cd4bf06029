//! Precision, recall and F1 for any aligner's output.
//!
//! For class `c` in {Body, Footnote}:
//! - TP: assignments labeled `c` whose matched reference belongs to `c`
//! - FP: assignments labeled `c` matched to the other class or to nothing
//! - FN: items of `c` not used by any TP assignment
//!
//! Several lines may match the same reference item. Each of them is a TP,
//! but the item counts once towards recall through a used-set.
//! Zero denominators give 0.0, never NaN.

use std::ops::AddAssign;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::model::{AlignmentResult, ReferenceClass, References};

/// Raw counts for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassCounts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl AddAssign for ClassCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.tp += rhs.tp;
        self.fp += rhs.fp;
        self.fn_ += rhs.fn_;
    }
}

/// Counts plus the derived scores for one class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    #[serde(flatten)]
    pub counts: ClassCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassMetrics {
    pub fn from_counts(counts: ClassCounts) -> Self {
        let precision = safe_div(counts.tp, counts.tp + counts.fp);
        let recall = safe_div(counts.tp, counts.tp + counts.fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            counts,
            precision,
            recall,
            f1,
        }
    }
}

fn safe_div(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Per-class metrics and their macro average.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub body: ClassMetrics,
    pub footnote: ClassMetrics,
    pub macro_f1: f64,
}

impl Metrics {
    pub fn from_counts(body: ClassCounts, footnote: ClassCounts) -> Self {
        let body = ClassMetrics::from_counts(body);
        let footnote = ClassMetrics::from_counts(footnote);
        Self {
            body,
            footnote,
            macro_f1: (body.f1 + footnote.f1) / 2.0,
        }
    }

    pub fn class(&self, class: ReferenceClass) -> &ClassMetrics {
        match class {
            ReferenceClass::Body => &self.body,
            ReferenceClass::Footnote => &self.footnote,
        }
    }
}

/// Counts TP/FP/FN for both classes.
pub fn count(result: &AlignmentResult, references: References<'_>) -> [ClassCounts; 2] {
    ReferenceClass::ALL.map(|class| {
        let mut counts = ClassCounts::default();
        let mut used: FxHashSet<usize> = FxHashSet::default();

        for assignment in &result.assignments {
            if assignment.assigned_label.class() != Some(class) {
                continue;
            }
            match assignment.matched_reference {
                Some(reference) if reference.class == class && references.contains(reference) => {
                    counts.tp += 1;
                    used.insert(reference.index);
                }
                _ => counts.fp += 1,
            }
        }

        counts.fn_ = references.get(class).len() - used.len();
        counts
    })
}

/// Scores an alignment result against the document's references.
pub fn evaluate(result: &AlignmentResult, references: References<'_>) -> Metrics {
    let [body, footnote] = count(result, references);
    Metrics::from_counts(body, footnote)
}
