//! Extracted text lines.

use serde::{Deserialize, Serialize};

/// A rectangle defined by (x0, y0, x1, y1) in page coordinates.
pub type Rect = (f64, f64, f64, f64);

/// One text line produced by the external PDF/OCR extractor.
///
/// Lines are immutable once extracted; aligners only read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "empty_bbox")]
    pub bbox: Rect,
    pub index: usize,
}

fn empty_bbox() -> Rect {
    (0.0, 0.0, 0.0, 0.0)
}

impl Line {
    pub fn new(index: usize, page: u32, bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page,
            bbox,
            index,
        }
    }

    /// Builds lines with sequential indices and no positional metadata.
    pub fn from_texts<I, S>(texts: I) -> Vec<Line>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Line::new(index, 0, empty_bbox(), text))
            .collect()
    }
}
