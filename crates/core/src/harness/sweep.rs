//! Algorithm × threshold sweeps over a single document.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::align::{AlgorithmId, Aligner};
use crate::config::{AlignConfig, HmmParams};
use crate::error::{AlignError, Result};
use crate::metrics::{self, ClassCounts, Metrics};
use crate::model::{AlignmentResult, Document};

/// Which configurations to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub algorithms: Vec<AlgorithmId>,
    /// Similarity thresholds to try; empty means the base config's threshold.
    pub thresholds: Vec<f64>,
    pub base: AlignConfig,
    pub hmm: HmmParams,
}

impl Sweep {
    pub fn new(
        algorithms: Vec<AlgorithmId>,
        thresholds: Vec<f64>,
        base: AlignConfig,
        hmm: HmmParams,
    ) -> Result<Self> {
        let sweep = Self {
            algorithms,
            thresholds,
            base,
            hmm,
        };
        sweep.plan()?;
        Ok(sweep)
    }

    /// Every algorithm at the base configuration.
    pub fn all_algorithms(base: AlignConfig) -> Result<Self> {
        Self::new(AlgorithmId::ALL.to_vec(), Vec::new(), base, HmmParams::default())
    }

    /// Builds one validated aligner per `(algorithm, threshold)` pair.
    ///
    /// Any invalid combination fails the whole plan before alignment starts.
    pub fn plan(&self) -> Result<Vec<RunSpec>> {
        if self.algorithms.is_empty() {
            return Err(AlignError::config(
                "algorithms",
                "[]",
                "at least one algorithm is required",
            ));
        }
        let thresholds = if self.thresholds.is_empty() {
            vec![self.base.similarity_threshold]
        } else {
            self.thresholds.clone()
        };

        iproduct!(&self.algorithms, &thresholds)
            .map(|(&algorithm, &threshold)| {
                let config = self.base.with_threshold(threshold)?;
                Ok(RunSpec {
                    algorithm,
                    threshold,
                    aligner: algorithm.build(config, self.hmm)?,
                })
            })
            .collect()
    }
}

/// One planned configuration with its aligner.
pub struct RunSpec {
    pub algorithm: AlgorithmId,
    pub threshold: f64,
    pub aligner: Box<dyn Aligner>,
}

impl std::fmt::Debug for RunSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSpec")
            .field("algorithm", &self.algorithm)
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Output of one run on one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub algorithm: AlgorithmId,
    pub threshold: f64,
    pub counts: [ClassCounts; 2],
    pub metrics: Metrics,
    pub result: AlignmentResult,
}

/// Everything persisted for one completed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document: String,
    pub runs: Vec<RunRecord>,
}

/// Runs every planned aligner on `document`.
///
/// The first failing run fails the document; no partial record is returned.
pub fn run_document(document: &Document, runs: &[RunSpec]) -> Result<DocumentRecord> {
    let references = document.references();
    let records = runs
        .iter()
        .map(|run| {
            let result = run.aligner.align(document)?;
            let counts = metrics::count(&result, references);
            Ok(RunRecord {
                algorithm: run.algorithm,
                threshold: run.threshold,
                counts,
                metrics: Metrics::from_counts(counts[0], counts[1]),
                result,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DocumentRecord {
        document: document.id.clone(),
        runs: records,
    })
}
