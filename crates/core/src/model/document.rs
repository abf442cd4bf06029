//! A single document: extracted lines plus its two reference sequences.

use serde::{Deserialize, Serialize};

use super::line::Line;
use super::reference::{ReferenceItem, References};

/// Everything an aligner needs for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub lines: Vec<Line>,
    #[serde(default)]
    pub body: Vec<ReferenceItem>,
    #[serde(default)]
    pub footnote: Vec<ReferenceItem>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        lines: Vec<Line>,
        body: Vec<ReferenceItem>,
        footnote: Vec<ReferenceItem>,
    ) -> Self {
        Self {
            id: id.into(),
            lines,
            body,
            footnote,
        }
    }

    /// Convenience constructor from plain strings.
    pub fn from_texts(
        id: impl Into<String>,
        lines: &[&str],
        body: &[&str],
        footnote: &[&str],
    ) -> Self {
        Self::new(
            id,
            Line::from_texts(lines.iter().copied()),
            ReferenceItem::sequence(body.iter().copied()),
            ReferenceItem::sequence(footnote.iter().copied()),
        )
    }

    pub fn references(&self) -> References<'_> {
        References::new(&self.body, &self.footnote)
    }
}
