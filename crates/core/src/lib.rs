//! linealign - label transfer from HTML ground truth onto extracted PDF lines.
//!
//! Given the noisy lines extracted from a PDF/OCR pass and the body and
//! footnote paragraphs of the document's HTML edition, each aligner decides
//! for every line whether it is body text, a footnote, or neither. Competing
//! aligners are scored with the same metrics and ranked by the harness.
//!
//! ```ignore
//! use linealign_core::{AlignConfig, Aligner, BaselineAligner, Document, evaluate};
//!
//! let doc = Document::from_texts("doc", &lines, &body, &footnotes);
//! let result = BaselineAligner::new(AlignConfig::default())?.align(&doc)?;
//! let metrics = evaluate(&result, doc.references());
//! ```

pub mod align;
pub mod config;
pub mod error;
pub mod export;
pub mod harness;
pub mod metrics;
pub mod model;
pub mod similarity;
pub mod taxonomy;

pub use align::{
    AlgorithmId, Aligner, BaselineAligner, DpAligner, HmmAligner, HmmState, TwoPassAligner,
};
pub use config::{AlignConfig, AlignConfigBuilder, HmmParams};
pub use error::{AlignError, Result};
pub use export::{LabeledRow, training_rows};
pub use metrics::{ClassCounts, ClassMetrics, Metrics, evaluate};
pub use model::{
    AlignmentResult, Assignment, Document, Label, Line, ReferenceClass, ReferenceId,
    ReferenceItem, References,
};
pub use similarity::{PreparedText, ScoreMode, score};
pub use taxonomy::LabelTaxonomy;
