//! Label-transfer aligners.
//!
//! Every aligner consumes a [`Document`] and returns an [`AlignmentResult`]
//! with exactly one [`Assignment`] per line, or an error; partial results are
//! never returned. Aligners keep no state between calls.
//!
//! - `baseline` - greedy locality-windowed best match
//! - `dp` - banded joint DP over (line, body, footnote) positions
//! - `two_pass` - two independent global alignments reconciled per line
//! - `hmm` - Viterbi decoding over {Body, Footnote, Other}

pub mod baseline;
pub mod dp;
pub mod hmm;
pub mod reward;
pub mod two_pass;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{AlignConfig, HmmParams};
use crate::error::{AlignError, Result};
use crate::model::{AlignmentResult, Assignment, Document, ReferenceClass};
use crate::similarity::PreparedText;

pub use baseline::BaselineAligner;
pub use dp::DpAligner;
pub use hmm::{HmmAligner, HmmState, viterbi};
pub use two_pass::TwoPassAligner;

/// Identifies the algorithm that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlgorithmId {
    #[serde(rename = "baseline")]
    Baseline,
    #[serde(rename = "dp")]
    DpTwoSequence,
    #[serde(rename = "two_pass")]
    TwoPass,
    #[serde(rename = "hmm")]
    HmmViterbi,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 4] = [
        AlgorithmId::Baseline,
        AlgorithmId::DpTwoSequence,
        AlgorithmId::TwoPass,
        AlgorithmId::HmmViterbi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::Baseline => "baseline",
            AlgorithmId::DpTwoSequence => "dp",
            AlgorithmId::TwoPass => "two_pass",
            AlgorithmId::HmmViterbi => "hmm",
        }
    }

    /// Builds a validated aligner for this algorithm.
    pub fn build(self, config: AlignConfig, hmm: HmmParams) -> Result<Box<dyn Aligner>> {
        Ok(match self {
            AlgorithmId::Baseline => Box::new(BaselineAligner::new(config)?),
            AlgorithmId::DpTwoSequence => Box::new(DpAligner::new(config)?),
            AlgorithmId::TwoPass => Box::new(TwoPassAligner::new(config)?),
            AlgorithmId::HmmViterbi => Box::new(HmmAligner::new(config, hmm)?),
        })
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "baseline" | "local" => Ok(AlgorithmId::Baseline),
            "dp" | "dp_two_sequence" => Ok(AlgorithmId::DpTwoSequence),
            "two_pass" | "twopass" | "nw" => Ok(AlgorithmId::TwoPass),
            "hmm" | "viterbi" | "hmm_viterbi" => Ok(AlgorithmId::HmmViterbi),
            _ => Err(AlignError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A label-transfer strategy.
pub trait Aligner: Send + Sync {
    fn id(&self) -> AlgorithmId;

    fn config(&self) -> &AlignConfig;

    fn align(&self, document: &Document) -> Result<AlignmentResult>;
}

/// Lines and references of one document, normalized once per call.
pub(crate) struct PreparedDocument {
    pub lines: Vec<PreparedText>,
    pub body: Vec<PreparedText>,
    pub footnote: Vec<PreparedText>,
}

impl PreparedDocument {
    pub fn new(document: &Document) -> Self {
        Self {
            lines: PreparedText::prepare_all(document.lines.iter().map(|l| l.text.as_str())),
            body: PreparedText::prepare_all(document.body.iter().map(|r| r.text.as_str())),
            footnote: PreparedText::prepare_all(document.footnote.iter().map(|r| r.text.as_str())),
        }
    }

    pub fn references(&self, class: ReferenceClass) -> &[PreparedText] {
        match class {
            ReferenceClass::Body => &self.body,
            ReferenceClass::Footnote => &self.footnote,
        }
    }
}

/// Rejects a document with no lines but non-empty references.
pub(crate) fn check_document(document: &Document) -> Result<()> {
    let references = document.references();
    if document.lines.is_empty() && !references.is_empty() {
        return Err(AlignError::EmptyLines {
            references: references.len(),
        });
    }
    Ok(())
}

/// Result for a document without any reference items: everything Original.
pub(crate) fn all_original(
    algorithm: AlgorithmId,
    config: AlignConfig,
    document: &Document,
) -> Result<AlignmentResult> {
    let assignments = (0..document.lines.len())
        .map(|i| Assignment::original(i, 0.0))
        .collect();
    finish(algorithm, config, assignments, document)
}

pub(crate) fn finish(
    algorithm: AlgorithmId,
    config: AlignConfig,
    assignments: Vec<Assignment>,
    document: &Document,
) -> Result<AlignmentResult> {
    AlignmentResult::new(
        algorithm,
        config,
        assignments,
        document.lines.len(),
        document.references(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for id in AlgorithmId::ALL {
            assert_eq!(id.as_str().parse::<AlgorithmId>().unwrap(), id);
        }
        assert_eq!("Two-Pass".parse::<AlgorithmId>().unwrap(), AlgorithmId::TwoPass);
        assert!("bogus".parse::<AlgorithmId>().is_err());
    }

    #[test]
    fn empty_lines_with_references_is_a_precondition_failure() {
        let doc = Document::from_texts("d", &[], &["body"], &[]);
        assert!(matches!(
            check_document(&doc),
            Err(AlignError::EmptyLines { references: 1 })
        ));
        let trivial = Document::from_texts("d", &[], &[], &[]);
        assert!(check_document(&trivial).is_ok());
    }
}
