//! Labeled training rows for the classifier corpus writer.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::model::{AlignmentResult, Line};
use crate::taxonomy::LabelTaxonomy;

/// One `(text, label)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub line_index: usize,
    pub page: u32,
    pub text: String,
    pub label: String,
    pub label_id: usize,
}

/// Pairs every line with the class its assignment maps to under `taxonomy`.
pub fn training_rows(
    lines: &[Line],
    result: &AlignmentResult,
    taxonomy: &LabelTaxonomy,
) -> Result<Vec<LabeledRow>> {
    if lines.len() != result.len() {
        return Err(AlignError::InconsistentResult(format!(
            "{} lines but {} assignments",
            lines.len(),
            result.len()
        )));
    }

    Ok(lines
        .iter()
        .zip(&result.assignments)
        .map(|(line, assignment)| LabeledRow {
            line_index: assignment.line_index,
            page: line.page,
            text: line.text.clone(),
            label: taxonomy.class_name(assignment.assigned_label).to_string(),
            label_id: taxonomy.id(assignment.assigned_label),
        })
        .collect())
}
