//! Alignment data model.
//!
//! This module contains the types flowing through every aligner:
//! - `line` - extracted PDF/OCR lines with positional metadata
//! - `reference` - ground-truth reference items and their two sequences
//! - `assignment` - per-line labels and the aligner output container
//! - `document` - one document's lines and references bundled together

pub mod assignment;
pub mod document;
pub mod line;
pub mod reference;

// Re-export main types for convenience
pub use assignment::{Assignment, AlignmentResult, Label};
pub use document::Document;
pub use line::{Line, Rect};
pub use reference::{ReferenceClass, ReferenceId, ReferenceItem, References};
