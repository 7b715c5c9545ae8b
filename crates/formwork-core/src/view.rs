//! Render-ready snapshots of a bound form.
//!
//! Every field, at any nesting depth, goes through the same
//! [`FieldTypeRegistry::resolve`] call, so list rows and group members get
//! the same behaviors as top-level fields.

use crate::appearance::{color_for, icon_for, DEFAULT_COLOR, DEFAULT_ICON};
use crate::controller::{FormController, FormState, SubmitMessage};
use crate::field::{FieldSpec, FieldType};
use crate::reference::{resolve_options, DragPayload, ReferenceOption, Selection};
use crate::registry::{FieldTypeRegistry, ResolvedField};
use crate::schema::Schema;
use crate::value::Value;

/// The drag currently in progress, if any. Owned by whoever hosts the drag
/// source and passed into views explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    payload: Option<DragPayload>,
}

impl DragState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn dragging(payload: DragPayload) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    pub fn take(&mut self) -> Option<DragPayload> {
        self.payload.take()
    }

    /// Whether the current drag would be accepted by an assembly field
    /// targeting `target`.
    pub fn accepts(&self, target: Option<&str>) -> bool {
        matches!((&self.payload, target), (Some(p), Some(t)) if p.form_type == t)
    }
}

/// One field ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    pub resolved: ResolvedField<'a>,
    /// Current value, or the declared default when the value is cleared.
    pub value: Option<Value>,
    /// Only set on top-level fields; nested failures surface on the parent.
    pub error: Option<String>,
    /// Assembly fields: referenceable forms and the current selection.
    pub options: Vec<ReferenceOption>,
    pub selected: Vec<String>,
    /// Assembly fields: the current drag can be dropped here.
    pub drop_target: bool,
    /// List fields: one row of sub-field views per entry.
    pub rows: Vec<Vec<FieldView<'a>>>,
    /// Group fields: member views.
    pub members: Vec<FieldView<'a>>,
}

impl<'a> FieldView<'a> {
    pub fn name(&self) -> &'a str {
        let field: &'a FieldSpec = self.resolved.field;
        &field.name
    }

    pub fn label(&self) -> &'a str {
        let field: &'a FieldSpec = self.resolved.field;
        field.display_label()
    }

    pub fn required(&self) -> bool {
        self.resolved.field.is_required()
    }
}

/// One bound form ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub form_type: Option<&'a str>,
    pub icon: &'static str,
    pub color: &'static str,
    /// Present only while the raw-code panel is shown.
    pub raw_code: Option<&'a str>,
    pub state: FormState,
    pub message: Option<&'a SubmitMessage>,
    pub submit_enabled: bool,
    pub dragging: bool,
    pub fields: Vec<FieldView<'a>>,
}

impl FormController {
    /// Snapshot for rendering; `None` until a form is bound.
    pub fn view(&self, drag: &DragState) -> Option<FormView<'_>> {
        let form = self.form()?;
        let builder = ViewBuilder {
            registry: self.registry(),
            schema: self.schema(),
            drag,
        };
        let fields = form
            .fields
            .iter()
            .map(|field| {
                let mut view = builder.field(field, self.value(&field.name));
                view.error = self.error(&field.name).map(ToString::to_string);
                view
            })
            .collect();

        let form_type = form.form_type.as_deref();
        Some(FormView {
            name: &form.name,
            title: form.display_title(),
            description: form.description.as_deref(),
            form_type,
            icon: form_type.map_or(DEFAULT_ICON, icon_for),
            color: form_type.map_or(DEFAULT_COLOR, color_for),
            raw_code: self.raw_code_shown().then(|| self.raw_code()),
            state: self.state(),
            message: self.message(),
            submit_enabled: self.state() != FormState::Submitting,
            dragging: drag.is_dragging(),
            fields,
        })
    }
}

struct ViewBuilder<'r> {
    registry: &'r FieldTypeRegistry,
    schema: &'r Schema,
    drag: &'r DragState,
}

impl ViewBuilder<'_> {
    fn field<'a>(&self, field: &'a FieldSpec, value: Option<&Value>) -> FieldView<'a> {
        let resolved = self.registry.resolve(field);
        let mut view = FieldView {
            resolved,
            value: display_value(field, value),
            error: None,
            options: Vec::new(),
            selected: Vec::new(),
            drop_target: false,
            rows: Vec::new(),
            members: Vec::new(),
        };

        match field.field_type {
            FieldType::Assembly => {
                let target = field.target.as_deref();
                view.options = target
                    .map(|t| resolve_options(t, self.schema))
                    .unwrap_or_default();
                view.selected = Selection::from_value(value, field.multiple)
                    .names()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                view.drop_target = self.drag.accepts(target);
            }
            FieldType::List => {
                let rows = value.and_then(Value::as_list).unwrap_or_default();
                view.rows = rows
                    .iter()
                    .map(|row| self.children(&field.item_fields, row))
                    .collect();
            }
            FieldType::Group => {
                let members = value.cloned().unwrap_or_else(Value::empty_map);
                view.members = self.children(&field.fields, &members);
            }
            _ => {}
        }
        view
    }

    fn children<'a>(&self, fields: &'a [FieldSpec], container: &Value) -> Vec<FieldView<'a>> {
        let map = container.as_map();
        fields
            .iter()
            .map(|sub| self.field(sub, map.and_then(|m| m.get(&sub.name))))
            .collect()
    }
}

/// Cleared values (absent, null or empty text) display the declared
/// default. Other falsy values such as `0` or `false` are shown as-is.
fn display_value(field: &FieldSpec, value: Option<&Value>) -> Option<Value> {
    let cleared = match value {
        None | Some(Value::Null) => true,
        Some(Value::Text(s)) => s.is_empty(),
        Some(_) => false,
    };
    if cleared && field.default.is_some() {
        field.default.clone()
    } else {
        value.cloned()
    }
}
