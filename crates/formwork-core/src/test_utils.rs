//! Shared builders for tests. Enabled for unit tests and behind the
//! `test-utils` feature for integration tests and benches.

use std::sync::Arc;

use crate::controller::{FormController, Submitter};
use crate::error::SubmitError;
use crate::field::{FieldSpec, FieldType, FormSpec, SelectOption, ValidationRules};
use crate::schema::Schema;
use crate::value::{FormValues, Value};

// ---------------------------------------------------------------------------
// Field builders (label == name)
// ---------------------------------------------------------------------------

pub fn text_field(name: &str) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::Text)
}

pub fn number_field(name: &str, min: f64, max: f64) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::Number).with_rules(ValidationRules {
        min: Some(min),
        max: Some(max),
        ..Default::default()
    })
}

pub fn select_field(name: &str, options: &[&str]) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::Select).with_options(
        options
            .iter()
            .map(|o| SelectOption::Plain((*o).to_string()))
            .collect(),
    )
}

pub fn list_field(name: &str, item_fields: Vec<FieldSpec>) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::List).with_item_fields(item_fields)
}

pub fn assembly_field(name: &str, target: &str, multiple: bool) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::Assembly).with_target(target, multiple)
}

pub fn number_array_field(name: &str) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::NumberArray)
}

pub fn group_field(name: &str, members: Vec<FieldSpec>) -> FieldSpec {
    FieldSpec::new(name, name, FieldType::Group).with_members(members)
}

// ---------------------------------------------------------------------------
// Values and forms
// ---------------------------------------------------------------------------

/// A list row / group value.
pub fn row(entries: &[(&str, Value)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect(),
    )
}

pub fn values(entries: &[(&str, Value)]) -> FormValues {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// A fieldless form with a type tag; title is the name.
pub fn typed_form(name: &str, form_type: &str) -> FormSpec {
    FormSpec::new(name, name).with_type(form_type)
}

/// A small schema: a platform form with single and multi assembly fields,
/// plus referenceable sensor and weapon forms.
pub fn platform_schema() -> Schema {
    Schema::new(vec![
        FormSpec::new("platform_1", "Platform 1")
            .with_type("platform")
            .with_fields(vec![
                text_field("callsign").with_required(),
                number_field("speed", 0.0, 340.0).with_unit("m/s"),
                assembly_field("sensors", "sensor", true),
                assembly_field("weapon", "weapon", false),
            ]),
        FormSpec::new("radar_1", "Search Radar").with_type("sensor"),
        FormSpec::new("eo_1", "EO Turret").with_type("sensor"),
        FormSpec::new("gun_1", "Gun").with_type("weapon"),
    ])
}

/// A controller bound to the schema form `name`.
pub fn bound_controller(schema: Schema, name: &str) -> FormController {
    let mut controller = FormController::new(Arc::new(schema));
    if let Err(e) = controller.bind_named(name) {
        panic!("test schema has no form '{name}': {e}");
    }
    controller
}

// ---------------------------------------------------------------------------
// Submitters
// ---------------------------------------------------------------------------

/// Accepts every submission and records it.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    pub submissions: Vec<(String, FormValues)>,
}

impl Submitter for RecordingSubmitter {
    fn submit(&mut self, form: &str, values: &FormValues) -> Result<(), SubmitError> {
        self.submissions.push((form.to_string(), values.clone()));
        Ok(())
    }
}

/// Rejects every submission with a fixed message.
#[derive(Debug)]
pub struct FailingSubmitter {
    message: String,
    pub attempts: usize,
}

impl FailingSubmitter {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            attempts: 0,
        }
    }
}

impl Submitter for FailingSubmitter {
    fn submit(&mut self, _form: &str, _values: &FormValues) -> Result<(), SubmitError> {
        self.attempts += 1;
        Err(SubmitError::new(self.message.clone()))
    }
}
