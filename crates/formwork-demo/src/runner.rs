//! Headless walkthrough: loads a schema, wires references by drag and
//! drop, fills every form with sample values, submits, and renders.

use std::path::Path;
use std::sync::Arc;

use formwork_core::controller::{FormController, FormState};
use formwork_core::error::FormError;
use formwork_core::field::{FieldSpec, FieldType};
use formwork_core::gallery::{FormGallery, SchemaStatus};
use formwork_core::reference::DropOutcome;
use formwork_core::registry::{FieldTypeRegistry, InitialValue, RegistryBuilder, RegistryError};
use formwork_core::value::Value;

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::render::render_form;
use crate::submitter::DelayedSubmitter;

/// What a demo run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub forms: usize,
    /// References created by dropping one form onto another.
    pub links: usize,
    pub submitted: Vec<String>,
    pub failed: Vec<String>,
    /// One rendered block per form, in schema order.
    pub rendered: Vec<String>,
}

/// Load the schema into a status value; failures become `Unavailable`.
pub fn load_status(path: &Path) -> SchemaStatus {
    match formwork_data::load_schema(path) {
        Ok(schema) => SchemaStatus::Loaded(Arc::new(schema)),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "schema unavailable");
            SchemaStatus::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

/// Field types for the headless renderer: checkboxes start unchecked
/// instead of unset, so every one prints an explicit on/off value.
pub fn demo_registry() -> Result<FieldTypeRegistry, RegistryError> {
    let mut builder = RegistryBuilder::standard();
    builder.mutate(&FieldType::Checkbox, |def| {
        def.initial = InitialValue::False;
    })?;
    builder.build()
}

pub fn run(config: &DemoConfig) -> Result<RunReport, DemoError> {
    let registry = Arc::new(demo_registry()?);
    let mut gallery = match load_status(&config.schema) {
        SchemaStatus::Loaded(schema) => FormGallery::with_registry(schema, registry),
        SchemaStatus::Unavailable { reason } => return Err(DemoError::SchemaUnavailable(reason)),
        SchemaStatus::Pending => {
            return Err(DemoError::SchemaUnavailable("schema not loaded".to_string()));
        }
    };

    let mut report = RunReport {
        forms: gallery.controllers().len(),
        links: link_references(&mut gallery)?,
        ..Default::default()
    };

    let names: Vec<String> = gallery.schema().iter().map(|f| f.name.clone()).collect();
    let mut submitter = DelayedSubmitter::new(config.submit_delay(), config.fail_submissions);
    for name in &names {
        let controller = gallery.controller_mut(name)?;
        if config.show_raw_code && !controller.raw_code().is_empty() {
            controller.toggle_raw_code();
        }

        // First attempt shows what the empty form is missing.
        if let Err(FormError::ValidationFailed { count, .. }) = controller.submit(&mut submitter) {
            tracing::info!(form = %name, count, "empty form rejected");
            fill_form(controller)?;
        }
        if controller.state() != FormState::Submitted {
            match controller.submit(&mut submitter) {
                Ok(()) => report.submitted.push(name.clone()),
                Err(e) => {
                    tracing::warn!(form = %name, error = %e, "form not submitted");
                    report.failed.push(name.clone());
                }
            }
        } else {
            report.submitted.push(name.clone());
        }
    }

    report.rendered = gallery.views().iter().map(render_form).collect();
    Ok(report)
}

/// Drag every typed form onto each assembly field (of another form) that
/// targets its type.
fn link_references(gallery: &mut FormGallery) -> Result<usize, FormError> {
    let schema = gallery.schema().clone();
    let mut links = 0;
    for source in schema.iter() {
        let Some(form_type) = source.form_type.as_deref() else {
            continue;
        };
        for host in schema.iter().filter(|h| h.name != source.name) {
            let targets = host.fields.iter().filter(|f| {
                f.field_type == FieldType::Assembly && f.target.as_deref() == Some(form_type)
            });
            for field in targets {
                gallery.begin_drag(&source.name)?;
                if gallery.drop_on(&host.name, &field.name)? == DropOutcome::Added {
                    links += 1;
                }
            }
        }
    }
    Ok(links)
}

/// Replace every invalid top-level value with a sample. Returns how many
/// fields were changed.
fn fill_form(controller: &mut FormController) -> Result<usize, FormError> {
    let Some(form) = controller.form() else {
        return Err(FormError::NotBound);
    };
    let fields: Vec<FieldSpec> = form.fields.clone();
    let mut changed = 0;
    for field in &fields {
        if controller.error(&field.name).is_none() {
            continue;
        }
        if field.field_type == FieldType::Assembly {
            if let Some(option) = controller.reference_options(&field.name)?.first() {
                controller.select_reference(&field.name, &option.name)?;
                changed += 1;
            }
            continue;
        }
        if let Some(value) = sample_value(field) {
            controller.change_field(&field.name, value)?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// A value that satisfies the field's type and numeric/length rules.
/// Patterns are not synthesized.
pub fn sample_value(field: &FieldSpec) -> Option<Value> {
    let rules = field.validation.clone().unwrap_or_default();
    let value = match &field.field_type {
        FieldType::Text => {
            let len = rules.min_length.unwrap_or(0).max(4);
            let len = rules.max_length.filter(|m| *m > 0).map_or(len, |m| len.min(m));
            Value::from("x".repeat(len))
        }
        FieldType::Password => Value::from("s3cret-passphrase"),
        FieldType::Email => Value::from("demo@example.org"),
        FieldType::Number => Value::Number(sample_number(rules.min, rules.max)),
        FieldType::Boolean | FieldType::Checkbox => Value::Bool(true),
        FieldType::Select => Value::from(field.options.first()?.value()),
        FieldType::List => Value::List(vec![sample_map(&field.item_fields)]),
        FieldType::NumberArray => {
            Value::List(vec![Value::Number(sample_number(rules.min, rules.max))])
        }
        FieldType::Group => sample_map(&field.fields),
        FieldType::Assembly | FieldType::Unknown(_) => return None,
    };
    Some(value)
}

fn sample_number(min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (Some(lo), Some(hi)) => (lo + hi) / 2.0,
        (Some(lo), None) => lo,
        (None, Some(hi)) => hi.min(0.0),
        (None, None) => 1.0,
    }
}

fn sample_map(fields: &[FieldSpec]) -> Value {
    Value::Map(
        fields
            .iter()
            .filter_map(|f| sample_value(f).map(|v| (f.name.clone(), v)))
            .collect(),
    )
}
