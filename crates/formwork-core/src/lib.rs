//! Formwork Core -- schema-driven form rendering and validation.
//!
//! A schema is a list of form definitions. Each form declares typed fields;
//! this crate turns those declarations into live, validated form instances
//! without any per-form code.
//!
//! # Form Lifecycle
//!
//! 1. **Bind** -- A [`controller::FormController`] binds a form and derives
//!    every field's initial value from its type and declared default.
//! 2. **Edit** -- Each edit replaces one value and re-validates that field.
//! 3. **Submit** -- The whole form is validated; valid values go to a
//!    [`controller::Submitter`], and the outcome is reported back.
//!
//! ```rust,ignore
//! let mut form = FormController::new(schema.clone());
//! form.bind_named("platform_1")?;
//! form.change_field("callsign", Value::from("alpha"))?;
//! form.submit(&mut submitter)?;
//! ```
//!
//! # Key Types
//!
//! - [`field::FieldSpec`] / [`field::FormSpec`] -- Declarative field and form
//!   definitions, deserialized from schema files.
//! - [`validation`] -- Pure per-type validation rules producing
//!   [`error::FieldError`]s.
//! - [`registry::FieldTypeRegistry`] -- Immutable table mapping field types
//!   to input behaviors, props and initial values.
//! - [`reference`] -- Cross-form references for `assembly` fields: option
//!   resolution, click selection and drag-and-drop.
//! - [`view::FormView`] -- Render-ready snapshot of a bound form.
//! - [`gallery::FormGallery`] -- Every schema form side by side with a
//!   shared drag state.

pub mod appearance;
pub mod controller;
pub mod error;
pub mod field;
pub mod gallery;
pub mod reference;
pub mod registry;
pub mod schema;
pub mod validation;
pub mod value;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
