//! Label taxonomies for the downstream classifier corpus.
//!
//! Aligners always emit [`Label`]; a taxonomy decides which class name and
//! numeric id each label becomes in a training row. Several taxonomies can be
//! used side by side in one process.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::model::Label;

/// Serialized by class name, so deserialization is validated by
/// [`LabelTaxonomy::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxonomyDef", into = "TaxonomyDef")]
pub struct LabelTaxonomy {
    name: String,
    classes: Vec<String>,
    /// Class id per [`Label`], in `Label::ALL` order.
    ids: [usize; 3],
}

#[derive(Serialize, Deserialize)]
struct TaxonomyDef {
    name: String,
    classes: Vec<String>,
    body: String,
    footnote: String,
    original: String,
}

impl TryFrom<TaxonomyDef> for LabelTaxonomy {
    type Error = AlignError;

    fn try_from(def: TaxonomyDef) -> Result<Self> {
        Self::new(def.name, def.classes, &def.body, &def.footnote, &def.original)
    }
}

impl From<LabelTaxonomy> for TaxonomyDef {
    fn from(taxonomy: LabelTaxonomy) -> Self {
        let class = |label| taxonomy.class_name(label).to_string();
        Self {
            body: class(Label::Body),
            footnote: class(Label::Footnote),
            original: class(Label::Original),
            name: taxonomy.name,
            classes: taxonomy.classes,
        }
    }
}

impl Default for LabelTaxonomy {
    fn default() -> Self {
        Self::three_class()
    }
}

impl LabelTaxonomy {
    /// Builds a taxonomy mapping each label onto one of `classes`.
    pub fn new(
        name: impl Into<String>,
        classes: Vec<String>,
        body: &str,
        footnote: &str,
        original: &str,
    ) -> Result<Self> {
        let lookup = |class: &str| {
            classes.iter().position(|c| c == class).ok_or_else(|| {
                AlignError::config("taxonomy", class, "label maps to an unknown class")
            })
        };
        let ids = [lookup(body)?, lookup(footnote)?, lookup(original)?];
        Ok(Self {
            name: name.into(),
            classes,
            ids,
        })
    }

    /// `body`, `footnote`, `original`.
    pub fn three_class() -> Self {
        Self {
            name: "three-class".to_string(),
            classes: vec!["body".into(), "footnote".into(), "original".into()],
            ids: [0, 1, 2],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn id(&self, label: Label) -> usize {
        let slot = match label {
            Label::Body => 0,
            Label::Footnote => 1,
            Label::Original => 2,
        };
        self.ids[slot]
    }

    pub fn class_name(&self, label: Label) -> &str {
        &self.classes[self.id(label)]
    }
}
