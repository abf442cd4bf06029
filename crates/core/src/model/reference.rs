//! Ground-truth reference items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two disjoint reference sequences a line may be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceClass {
    Body,
    Footnote,
}

impl ReferenceClass {
    pub const ALL: [ReferenceClass; 2] = [ReferenceClass::Body, ReferenceClass::Footnote];

    pub fn other(self) -> Self {
        match self {
            ReferenceClass::Body => ReferenceClass::Footnote,
            ReferenceClass::Footnote => ReferenceClass::Body,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceClass::Body => "body",
            ReferenceClass::Footnote => "footnote",
        }
    }
}

impl fmt::Display for ReferenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ground-truth paragraph from the HTML edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub text: String,
    pub index: usize,
}

impl ReferenceItem {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    /// Builds a reference sequence with sequential indices.
    pub fn sequence<I, S>(texts: I) -> Vec<ReferenceItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ReferenceItem::new(index, text))
            .collect()
    }
}

/// Pointer to a specific item of one reference sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferenceId {
    pub class: ReferenceClass,
    pub index: usize,
}

impl ReferenceId {
    pub fn new(class: ReferenceClass, index: usize) -> Self {
        Self { class, index }
    }
}

/// Borrowed view of a document's body and footnote sequences.
#[derive(Debug, Clone, Copy)]
pub struct References<'a> {
    pub body: &'a [ReferenceItem],
    pub footnote: &'a [ReferenceItem],
}

impl<'a> References<'a> {
    pub fn new(body: &'a [ReferenceItem], footnote: &'a [ReferenceItem]) -> Self {
        Self { body, footnote }
    }

    pub fn get(&self, class: ReferenceClass) -> &'a [ReferenceItem] {
        match class {
            ReferenceClass::Body => self.body,
            ReferenceClass::Footnote => self.footnote,
        }
    }

    pub fn len(&self) -> usize {
        self.body.len() + self.footnote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.footnote.is_empty()
    }

    /// Whether `id` points inside the indicated sequence.
    pub fn contains(&self, id: ReferenceId) -> bool {
        id.index < self.get(id.class).len()
    }
}
