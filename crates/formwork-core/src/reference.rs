//! Cross-form references for `assembly` fields.
//!
//! An assembly field names other forms of the same schema. Candidates are
//! found by type compatibility: every form whose `type` equals the field's
//! `target` (exact, case-sensitive) is an option, in schema order.
//!
//! Two interaction paths change a multi-select, with different policies:
//! clicking an option toggles it, while dropping a dragged form adds it at
//! most once and never removes it.

use serde::{Deserialize, Serialize};

use crate::appearance::icon_for;
use crate::field::FormSpec;
use crate::schema::Schema;
use crate::value::Value;

// ===========================================================================
// Options
// ===========================================================================

/// A form that can be referenced by an assembly field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOption {
    pub name: String,
    pub title: String,
    pub form_type: String,
    pub icon: &'static str,
}

/// All forms of `schema` whose type equals `target`, in schema order.
pub fn resolve_options(target: &str, schema: &Schema) -> Vec<ReferenceOption> {
    schema
        .iter()
        .filter(|form| form.form_type.as_deref() == Some(target))
        .map(|form| ReferenceOption {
            name: form.name.clone(),
            title: form.display_title().to_string(),
            form_type: target.to_string(),
            icon: icon_for(target),
        })
        .collect()
}

// ===========================================================================
// Drag payload
// ===========================================================================

/// Record transferred from a drag source to a drop target. Only `form_type`
/// takes part in the acceptance rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub form_type: String,
    pub icon: String,
    /// Position of the dragged form in the gallery, for reordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}

impl DragPayload {
    /// Payload for dragging a whole form. Untyped forms cannot be dragged
    /// into assembly fields, so they produce no payload.
    pub fn from_form(form: &FormSpec, source_index: usize) -> Option<Self> {
        let form_type = form.form_type.as_deref()?;
        Some(Self {
            name: form.name.clone(),
            title: form.display_title().to_string(),
            form_type: form_type.to_string(),
            icon: icon_for(form_type).to_string(),
            source_index: Some(source_index),
        })
    }

    pub fn from_option(option: &ReferenceOption) -> Self {
        Self {
            name: option.name.clone(),
            title: option.title.clone(),
            form_type: option.form_type.clone(),
            icon: option.icon.to_string(),
            source_index: None,
        }
    }

    /// Serialize for the drag-and-drop transfer channel.
    pub fn to_transfer(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_transfer(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

// ===========================================================================
// Selection
// ===========================================================================

/// Outcome of dropping a payload onto an assembly field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Added,
    /// Matching type, but the name was already selected. No change.
    AlreadyPresent,
    /// Type mismatch. No change.
    Rejected,
}

impl DropOutcome {
    pub fn changed(self) -> bool {
        self == DropOutcome::Added
    }
}

/// Current selection of an assembly field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<String>),
    Multiple(Vec<String>),
}

impl Selection {
    /// Interpret a stored field value. Non-text entries are ignored.
    pub fn from_value(value: Option<&Value>, multiple: bool) -> Self {
        if multiple {
            let names = value
                .and_then(Value::as_list)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            Selection::Multiple(names)
        } else {
            let name = value
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            Selection::Single(name)
        }
    }

    /// Value to store back. An empty single selection is "unset".
    pub fn into_value(self) -> Option<Value> {
        match self {
            Selection::Single(name) => name.map(Value::Text),
            Selection::Multiple(names) => {
                Some(Value::List(names.into_iter().map(Value::Text).collect()))
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Selection::Single(current) => current.as_deref() == Some(name),
            Selection::Multiple(names) => names.iter().any(|n| n == name),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            Selection::Single(current) => current.as_deref().into_iter().collect(),
            Selection::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Click selection: single-select replaces, multi-select toggles
    /// (present is removed, absent is appended).
    pub fn select(&mut self, name: &str) {
        match self {
            Selection::Single(current) => *current = Some(name.to_string()),
            Selection::Multiple(names) => {
                if let Some(pos) = names.iter().position(|n| n == name) {
                    names.remove(pos);
                } else {
                    names.push(name.to_string());
                }
            }
        }
    }

    /// Remove a name from a multi-select. Always permitted; returns whether
    /// anything changed. Single selections are not affected.
    pub fn remove(&mut self, name: &str) -> bool {
        match self {
            Selection::Single(_) => false,
            Selection::Multiple(names) => {
                let before = names.len();
                names.retain(|n| n != name);
                names.len() != before
            }
        }
    }

    /// Drag-and-drop assignment. Accepted only when the payload's type equals
    /// `target`; a multi-select gains the name at most once.
    pub fn accept_drop(&mut self, payload: &DragPayload, target: &str) -> DropOutcome {
        if payload.form_type != target {
            return DropOutcome::Rejected;
        }
        if self.contains(&payload.name) {
            return DropOutcome::AlreadyPresent;
        }
        match self {
            Selection::Single(current) => *current = Some(payload.name.clone()),
            Selection::Multiple(names) => names.push(payload.name.clone()),
        }
        DropOutcome::Added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            typed_form("a", "T1"),
            typed_form("b", "T2"),
            typed_form("c", "T1"),
            FormSpec::new("d", "Untyped"),
        ])
    }

    fn payload(name: &str, form_type: &str) -> DragPayload {
        DragPayload {
            name: name.to_string(),
            title: name.to_string(),
            form_type: form_type.to_string(),
            icon: icon_for(form_type).to_string(),
            source_index: None,
        }
    }

    // -----------------------------------------------------------------------
    // resolve_options
    // -----------------------------------------------------------------------

    #[test]
    fn resolves_exact_matches_in_schema_order() {
        let options = resolve_options("T1", &sample_schema());
        let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(resolve_options("T9", &sample_schema()).is_empty());
        assert!(resolve_options("t1", &sample_schema()).is_empty());
        assert!(resolve_options("T1", &Schema::default()).is_empty());
    }

    #[test]
    fn option_title_falls_back_to_name() {
        let schema = Schema::new(vec![FormSpec::new("radar_1", "").with_type("sensor")]);
        let options = resolve_options("sensor", &schema);
        assert_eq!(options[0].title, "radar_1");
        assert_eq!(options[0].icon, "📡");
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    #[test]
    fn click_toggles_multi_select() {
        let mut sel = Selection::Multiple(vec![]);
        sel.select("a");
        sel.select("c");
        assert_eq!(sel.names(), vec!["a", "c"]);
        sel.select("a");
        assert_eq!(sel.names(), vec!["c"]);
        sel.select("a");
        assert_eq!(sel.names(), vec!["c", "a"]);
    }

    #[test]
    fn click_replaces_single_select() {
        let mut sel = Selection::Single(None);
        sel.select("a");
        sel.select("b");
        assert_eq!(sel.clone().into_value(), Some(Value::from("b")));
    }

    #[test]
    fn remove_has_no_floor() {
        let mut sel = Selection::Multiple(vec!["a".to_string()]);
        assert!(sel.remove("a"));
        assert!(sel.names().is_empty());
        assert!(!sel.remove("a"));
        assert_eq!(sel.into_value(), Some(Value::empty_list()));
    }

    #[test]
    fn drop_with_mismatched_type_is_rejected_without_change() {
        let mut sel = Selection::Multiple(vec!["a".to_string()]);
        let before = sel.clone();
        assert_eq!(sel.accept_drop(&payload("b", "T2"), "T1"), DropOutcome::Rejected);
        assert_eq!(sel, before);
    }

    #[test]
    fn repeated_drop_adds_once() {
        let mut sel = Selection::Multiple(vec![]);
        assert_eq!(sel.accept_drop(&payload("c", "T1"), "T1"), DropOutcome::Added);
        assert_eq!(
            sel.accept_drop(&payload("c", "T1"), "T1"),
            DropOutcome::AlreadyPresent
        );
        assert_eq!(sel.names(), vec!["c"]);
    }

    #[test]
    fn drop_on_single_select_replaces() {
        let mut sel = Selection::Single(Some("a".to_string()));
        assert!(sel.accept_drop(&payload("c", "T1"), "T1").changed());
        assert_eq!(sel.names(), vec!["c"]);
    }

    #[test]
    fn from_value_ignores_non_text() {
        let value = Value::List(vec!["a".into(), 3.0.into()]);
        let sel = Selection::from_value(Some(&value), true);
        assert_eq!(sel.names(), vec!["a"]);
        assert_eq!(Selection::from_value(None, false), Selection::Single(None));
        assert_eq!(
            Selection::from_value(Some(&Value::from("")), false),
            Selection::Single(None)
        );
    }

    // -----------------------------------------------------------------------
    // Drag payload
    // -----------------------------------------------------------------------

    #[test]
    fn payload_transfer_uses_type_key() {
        let p = payload("a", "T1");
        let json = p.to_transfer().unwrap();
        assert!(json.contains(r#""type":"T1""#));
        assert_eq!(DragPayload::from_transfer(&json).unwrap(), p);
    }

    #[test]
    fn untyped_form_has_no_payload() {
        assert!(DragPayload::from_form(&FormSpec::new("d", "D"), 0).is_none());
        let p = DragPayload::from_form(&typed_form("a", "sensor"), 2).unwrap();
        assert_eq!(p.source_index, Some(2));
        assert_eq!(p.icon, "📡");
    }
}
