//! Per-line label assignments and the aligner output container.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::align::AlgorithmId;
use crate::config::{AlignConfig, HmmParams};
use crate::error::{AlignError, Result};

use super::reference::{ReferenceClass, ReferenceId, References};

/// The label transferred onto a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Body,
    Footnote,
    /// Neither reference class: headers, footers, OCR noise.
    Original,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Body, Label::Footnote, Label::Original];

    /// The reference class this label claims, if any.
    pub fn class(self) -> Option<ReferenceClass> {
        match self {
            Label::Body => Some(ReferenceClass::Body),
            Label::Footnote => Some(ReferenceClass::Footnote),
            Label::Original => None,
        }
    }

    pub fn is_confident(self) -> bool {
        self != Label::Original
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Body => "body",
            Label::Footnote => "footnote",
            Label::Original => "original",
        }
    }
}

impl From<ReferenceClass> for Label {
    fn from(class: ReferenceClass) -> Self {
        match class {
            ReferenceClass::Body => Label::Body,
            ReferenceClass::Footnote => Label::Footnote,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision for one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub line_index: usize,
    pub assigned_label: Label,
    pub matched_reference: Option<ReferenceId>,
    pub similarity_score: f64,
}

impl Assignment {
    /// A line left unmatched.
    pub fn original(line_index: usize, similarity_score: f64) -> Self {
        Self {
            line_index,
            assigned_label: Label::Original,
            matched_reference: None,
            similarity_score,
        }
    }

    /// A line matched to a specific reference item.
    pub fn matched(line_index: usize, reference: ReferenceId, similarity_score: f64) -> Self {
        Self {
            line_index,
            assigned_label: Label::from(reference.class),
            matched_reference: Some(reference),
            similarity_score,
        }
    }
}

/// Output of one aligner call: exactly one assignment per input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub algorithm: AlgorithmId,
    pub config: AlignConfig,
    /// HMM parameters the result was decoded with; `None` for other aligners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmm: Option<HmmParams>,
    pub assignments: Vec<Assignment>,
}

impl AlignmentResult {
    /// Creates a result after checking it against the document it describes.
    ///
    /// Fails when the assignment count differs from `line_count`, when an
    /// assignment is out of order, when a matched reference points outside
    /// its sequence, or when a score leaves [0, 1].
    pub fn new(
        algorithm: AlgorithmId,
        config: AlignConfig,
        assignments: Vec<Assignment>,
        line_count: usize,
        references: References<'_>,
    ) -> Result<Self> {
        if assignments.len() != line_count {
            return Err(AlignError::InconsistentResult(format!(
                "{} assignments for {} lines",
                assignments.len(),
                line_count
            )));
        }
        for (pos, assignment) in assignments.iter().enumerate() {
            if assignment.line_index != pos {
                return Err(AlignError::InconsistentResult(format!(
                    "assignment at position {} carries line index {}",
                    pos, assignment.line_index
                )));
            }
            if let Some(reference) = assignment.matched_reference {
                if !references.contains(reference) {
                    return Err(AlignError::InconsistentResult(format!(
                        "line {} references missing {} item {}",
                        pos, reference.class, reference.index
                    )));
                }
            }
            let score = assignment.similarity_score;
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(AlignError::InconsistentResult(format!(
                    "line {} has similarity score {}",
                    pos, score
                )));
            }
        }

        Ok(Self {
            algorithm,
            config,
            hmm: None,
            assignments,
        })
    }

    /// Records the HMM parameters used to produce this result.
    pub fn with_hmm(mut self, params: HmmParams) -> Self {
        self.hmm = Some(params);
        self
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.assignments.iter().map(|a| a.assigned_label).collect()
    }

    /// Number of Body/Footnote assignments.
    pub fn confident_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.assigned_label.is_confident())
            .count()
    }
}
