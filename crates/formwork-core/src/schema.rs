//! The ordered collection of forms loaded at once.

use serde::{Deserialize, Serialize};

use crate::field::FormSpec;

/// Wire wrapper around one form: schemas list forms as `{form: ...}` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormEntry {
    pub form: FormSpec,
}

/// Ordered sequence of forms. Order is display order.
///
/// Form names are expected to be unique; the loader enforces this; the
/// engine trusts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<FormEntry>", into = "Vec<FormEntry>")]
pub struct Schema {
    forms: Vec<FormSpec>,
}

impl Schema {
    pub fn new(forms: Vec<FormSpec>) -> Self {
        Self { forms }
    }

    pub fn forms(&self) -> &[FormSpec] {
        &self.forms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormSpec> {
        self.forms.iter()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Look up a form by its unique name.
    pub fn get(&self, name: &str) -> Option<&FormSpec> {
        self.forms.iter().find(|f| f.name == name)
    }
}

impl From<Vec<FormEntry>> for Schema {
    fn from(entries: Vec<FormEntry>) -> Self {
        Self {
            forms: entries.into_iter().map(|e| e.form).collect(),
        }
    }
}

impl From<Schema> for Vec<FormEntry> {
    fn from(schema: Schema) -> Self {
        schema
            .forms
            .into_iter()
            .map(|form| FormEntry { form })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FormSpec;
    type IntoIter = std::slice::Iter<'a, FormSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.iter()
    }
}
