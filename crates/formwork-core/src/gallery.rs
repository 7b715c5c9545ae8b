//! All forms of a schema shown side by side, one controller each, sharing
//! a single drag state so any form can be dragged into any other form's
//! assembly fields.

use std::sync::Arc;

use crate::controller::FormController;
use crate::error::FormError;
use crate::reference::{DragPayload, DropOutcome};
use crate::registry::FieldTypeRegistry;
use crate::schema::Schema;
use crate::view::{DragState, FormView};

/// Where the gallery's schema currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaStatus {
    /// Not loaded yet.
    Pending,
    /// Loading failed; nothing is rendered.
    Unavailable { reason: String },
    Loaded(Arc<Schema>),
}

impl SchemaStatus {
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        match self {
            SchemaStatus::Loaded(schema) => Some(schema),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct FormGallery {
    schema: Arc<Schema>,
    controllers: Vec<FormController>,
    drag: DragState,
}

impl FormGallery {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_registry(schema, Arc::new(FieldTypeRegistry::standard()))
    }

    /// One bound controller per schema form, in schema order.
    pub fn with_registry(schema: Arc<Schema>, registry: Arc<FieldTypeRegistry>) -> Self {
        let controllers = schema
            .iter()
            .map(|form| FormController::for_form(schema.clone(), registry.clone(), form.clone()))
            .collect();
        tracing::info!(forms = schema.len(), "gallery ready");
        Self {
            schema,
            controllers,
            drag: DragState::idle(),
        }
    }

    /// A gallery for a loaded schema; `None` while pending or unavailable.
    pub fn from_status(status: &SchemaStatus) -> Option<Self> {
        status.schema().map(|schema| Self::new(schema.clone()))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn controllers(&self) -> &[FormController] {
        &self.controllers
    }

    pub fn controller(&self, form: &str) -> Result<&FormController, FormError> {
        self.controllers
            .iter()
            .find(|c| c.form_name() == form)
            .ok_or_else(|| unknown_form(form))
    }

    pub fn controller_mut(&mut self, form: &str) -> Result<&mut FormController, FormError> {
        self.controllers
            .iter_mut()
            .find(|c| c.form_name() == form)
            .ok_or_else(|| unknown_form(form))
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Start dragging the form called `form`. Untyped forms cannot be
    /// dropped anywhere, so `Ok(false)` reports that no drag started.
    pub fn begin_drag(&mut self, form: &str) -> Result<bool, FormError> {
        let (index, spec) = self
            .schema
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == form)
            .ok_or_else(|| unknown_form(form))?;
        match DragPayload::from_form(spec, index) {
            Some(payload) => {
                tracing::debug!(form, form_type = %payload.form_type, "drag started");
                self.drag = DragState::dragging(payload);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Start a drag from an externally supplied payload.
    pub fn begin_drag_payload(&mut self, payload: DragPayload) {
        self.drag = DragState::dragging(payload);
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::idle();
    }

    /// Drop the current drag onto `field` of `form`. The drag ends whatever
    /// the outcome; with no drag in progress the drop is rejected.
    pub fn drop_on(&mut self, form: &str, field: &str) -> Result<DropOutcome, FormError> {
        let Some(payload) = self.drag.take() else {
            return Ok(DropOutcome::Rejected);
        };
        self.controller_mut(form)?.drop_reference(field, &payload)
    }

    /// Snapshots of every form, in schema order.
    pub fn views(&self) -> Vec<FormView<'_>> {
        self.controllers
            .iter()
            .filter_map(|c| c.view(&self.drag))
            .collect()
    }
}

fn unknown_form(name: &str) -> FormError {
    FormError::UnknownForm {
        name: name.to_string(),
    }
}
