//! Form instance controller: owns one form's live state.
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized --bind--> Ready --begin_submit--> Submitting --ok--> Submitted
//!                           ^                         |
//!                           +-----invalid / failed----+
//! ```
//!
//! Binding derives initial values field by field and fully replaces any
//! previous values and errors. Every edit re-validates only the edited field;
//! submission validates the whole form. Edits after a successful submission
//! return the form to `Ready`.

use std::sync::Arc;

use crate::error::{FormError, SubmitError};
use crate::field::{FieldSpec, FieldType, FormSpec};
use crate::reference::{resolve_options, DragPayload, DropOutcome, ReferenceOption, Selection};
use crate::registry::{seed_row, FieldTypeRegistry};
use crate::schema::Schema;
use crate::validation::{validate_field, validate_form, ValidationErrors};
use crate::value::{FormValues, Value};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Submitted successfully.";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Submission failed, please try again.";

/// Logical state of a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Uninitialized,
    Ready,
    Submitting,
    Submitted,
}

/// User-visible outcome of the last submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMessage {
    Success(String),
    Failure(String),
}

impl SubmitMessage {
    pub fn text(&self) -> &str {
        match self {
            SubmitMessage::Success(text) | SubmitMessage::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitMessage::Success(_))
    }
}

/// The external submission boundary. Receives validated values.
pub trait Submitter {
    fn submit(&mut self, form: &str, values: &FormValues) -> Result<(), SubmitError>;
}

/// Live state of one form.
#[derive(Debug, Clone)]
pub struct FormController {
    schema: Arc<Schema>,
    registry: Arc<FieldTypeRegistry>,
    form: Option<FormSpec>,
    values: FormValues,
    errors: ValidationErrors,
    state: FormState,
    message: Option<SubmitMessage>,
    show_raw_code: bool,
}

impl FormController {
    /// An unbound controller reading `schema` for reference resolution.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_registry(schema, Arc::new(FieldTypeRegistry::standard()))
    }

    pub fn with_registry(schema: Arc<Schema>, registry: Arc<FieldTypeRegistry>) -> Self {
        Self {
            schema,
            registry,
            form: None,
            values: FormValues::new(),
            errors: ValidationErrors::new(),
            state: FormState::Uninitialized,
            message: None,
            show_raw_code: false,
        }
    }

    /// A controller already bound to `form`.
    pub fn for_form(schema: Arc<Schema>, registry: Arc<FieldTypeRegistry>, form: FormSpec) -> Self {
        let mut controller = Self::with_registry(schema, registry);
        controller.install(form);
        controller
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// Bind a form, discarding all prior values, errors and messages.
    /// Refused while a submission is in flight.
    pub fn bind(&mut self, form: FormSpec) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::SubmissionInFlight {
                form: self.form_name().to_string(),
            });
        }
        self.install(form);
        Ok(())
    }

    /// Bind the schema form called `name`.
    pub fn bind_named(&mut self, name: &str) -> Result<(), FormError> {
        let form = self
            .schema
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownForm {
                name: name.to_string(),
            })?;
        self.bind(form)
    }

    fn install(&mut self, form: FormSpec) {
        self.values = form
            .fields
            .iter()
            .filter_map(|field| {
                self.registry
                    .initial_value(field)
                    .map(|v| (field.name.clone(), v))
            })
            .collect();
        self.errors.clear();
        self.message = None;
        self.show_raw_code = false;
        self.state = FormState::Ready;
        tracing::debug!(form = %form.name, fields = form.fields.len(), "form bound");
        self.form = Some(form);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn form(&self) -> Option<&FormSpec> {
        self.form.as_ref()
    }

    /// Name of the bound form, empty when unbound.
    pub fn form_name(&self) -> &str {
        self.form.as_ref().map_or("", |f| f.name.as_str())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of a field; `None` when unset or not part of the form.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&crate::error::FieldError> {
        self.errors.get(name)
    }

    pub fn message(&self) -> Option<&SubmitMessage> {
        self.message.as_ref()
    }

    /// The bound form's verbatim source, empty when it carries none.
    pub fn raw_code(&self) -> &str {
        self.form
            .as_ref()
            .and_then(|f| f.raw_code.as_deref())
            .unwrap_or("")
    }

    pub fn raw_code_shown(&self) -> bool {
        self.show_raw_code
    }

    pub fn toggle_raw_code(&mut self) -> bool {
        self.show_raw_code = !self.show_raw_code;
        self.show_raw_code
    }

    fn spec(&self, name: &str) -> Result<&FieldSpec, FormError> {
        let form = self.form.as_ref().ok_or(FormError::NotBound)?;
        form.field(name).ok_or_else(|| FormError::UnknownField {
            form: form.name.clone(),
            field: name.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Replace a field's value and re-validate that field only.
    pub fn change_field(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        self.spec(name)?;
        self.commit(name, Some(value));
        Ok(())
    }

    fn commit(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(v) => self.values.insert(name.to_string(), v),
            None => self.values.remove(name),
        };
        self.revalidate(name);
        if self.state == FormState::Submitted {
            self.state = FormState::Ready;
        }
        tracing::debug!(
            form = %self.form_name(),
            field = name,
            valid = !self.errors.contains_key(name),
            "field changed"
        );
    }

    fn revalidate(&mut self, name: &str) {
        let error = self
            .form
            .as_ref()
            .and_then(|f| f.field(name))
            .and_then(|field| validate_field(field, self.values.get(name)));
        match error {
            Some(e) => {
                self.errors.insert(name.to_string(), e);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    fn sequence(&self, name: &str) -> Vec<Value> {
        self.values
            .get(name)
            .and_then(Value::as_list)
            .map(<[Value]>::to_vec)
            .unwrap_or_default()
    }

    /// Append an entry to a `list` (a fresh seeded row) or `number[]` field
    /// (an empty entry). Returns the new length.
    pub fn add_item(&mut self, name: &str) -> Result<usize, FormError> {
        let field = self.spec(name)?;
        let entry = match field.field_type {
            FieldType::List => seed_row(&field.item_fields),
            FieldType::NumberArray => Value::Null,
            _ => return Err(wrong_kind(field, "a list or number[] field")),
        };
        let mut items = self.sequence(name);
        items.push(entry);
        let len = items.len();
        self.commit(name, Some(Value::List(items)));
        Ok(len)
    }

    /// Remove one entry of a `list` or `number[]` field. The last remaining
    /// entry is never removed; `Ok(false)` reports the refusal.
    pub fn remove_item(&mut self, name: &str, index: usize) -> Result<bool, FormError> {
        let field = self.spec(name)?;
        if !matches!(field.field_type, FieldType::List | FieldType::NumberArray) {
            return Err(wrong_kind(field, "a list or number[] field"));
        }
        let mut items = self.sequence(name);
        if index >= items.len() {
            return Err(out_of_bounds(name, index));
        }
        if items.len() <= 1 {
            return Ok(false);
        }
        items.remove(index);
        self.commit(name, Some(Value::List(items)));
        Ok(true)
    }

    /// Set one entry of a `number[]` field.
    pub fn set_item(&mut self, name: &str, index: usize, value: Value) -> Result<(), FormError> {
        let field = self.spec(name)?;
        if field.field_type != FieldType::NumberArray {
            return Err(wrong_kind(field, "a number[] field"));
        }
        let mut items = self.sequence(name);
        let slot = items.get_mut(index).ok_or_else(|| out_of_bounds(name, index))?;
        *slot = value;
        self.commit(name, Some(Value::List(items)));
        Ok(())
    }

    /// Set one sub-field of one row of a `list` field.
    pub fn set_item_field(
        &mut self,
        name: &str,
        index: usize,
        member: &str,
        value: Value,
    ) -> Result<(), FormError> {
        let field = self.spec(name)?;
        if field.field_type != FieldType::List {
            return Err(wrong_kind(field, "a list field"));
        }
        if !field.item_fields.iter().any(|f| f.name == member) {
            return Err(FormError::UnknownField {
                form: self.form_name().to_string(),
                field: format!("{name}.{member}"),
            });
        }
        let mut rows = self.sequence(name);
        let row = rows.get_mut(index).ok_or_else(|| out_of_bounds(name, index))?;
        if !matches!(row, Value::Map(_)) {
            *row = Value::empty_map();
        }
        if let Value::Map(map) = row {
            map.insert(member.to_string(), value);
        }
        self.commit(name, Some(Value::List(rows)));
        Ok(())
    }

    /// Set one member of a `group` field.
    pub fn set_group_field(
        &mut self,
        name: &str,
        member: &str,
        value: Value,
    ) -> Result<(), FormError> {
        let field = self.spec(name)?;
        if field.field_type != FieldType::Group {
            return Err(wrong_kind(field, "a group field"));
        }
        if !field.fields.iter().any(|f| f.name == member) {
            return Err(FormError::UnknownField {
                form: self.form_name().to_string(),
                field: format!("{name}.{member}"),
            });
        }
        let mut members = self
            .values
            .get(name)
            .and_then(Value::as_map)
            .cloned()
            .unwrap_or_default();
        members.insert(member.to_string(), value);
        self.commit(name, Some(Value::Map(members)));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Assembly fields
    // -----------------------------------------------------------------------

    fn assembly(&self, name: &str) -> Result<(&FieldSpec, Selection), FormError> {
        let field = self.spec(name)?;
        if field.field_type != FieldType::Assembly {
            return Err(wrong_kind(field, "an assembly field"));
        }
        let selection = Selection::from_value(self.values.get(name), field.multiple);
        Ok((field, selection))
    }

    /// Forms that an assembly field can reference.
    pub fn reference_options(&self, name: &str) -> Result<Vec<ReferenceOption>, FormError> {
        let (field, _) = self.assembly(name)?;
        Ok(field
            .target
            .as_deref()
            .map(|target| resolve_options(target, &self.schema))
            .unwrap_or_default())
    }

    /// Click selection: replaces a single selection, toggles a multiple one.
    pub fn select_reference(&mut self, name: &str, option: &str) -> Result<(), FormError> {
        let (_, mut selection) = self.assembly(name)?;
        selection.select(option);
        self.commit(name, selection.into_value());
        Ok(())
    }

    /// Remove a name from a multi-select assembly field.
    pub fn remove_reference(&mut self, name: &str, option: &str) -> Result<bool, FormError> {
        let (_, mut selection) = self.assembly(name)?;
        if !selection.remove(option) {
            return Ok(false);
        }
        self.commit(name, selection.into_value());
        Ok(true)
    }

    /// Drag-and-drop assignment. A payload whose type differs from the
    /// field's target is rejected without any state change.
    pub fn drop_reference(
        &mut self,
        name: &str,
        payload: &DragPayload,
    ) -> Result<DropOutcome, FormError> {
        let (field, mut selection) = self.assembly(name)?;
        let target = field.target.clone().unwrap_or_default();
        let outcome = selection.accept_drop(payload, &target);
        tracing::debug!(
            form = %self.form_name(),
            field = name,
            dropped = %payload.name,
            ?outcome,
            "reference dropped"
        );
        if outcome.changed() {
            self.commit(name, selection.into_value());
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Start a submission: `Ready -> Submitting`, then validate the whole
    /// form. Invalid forms fall back to `Ready` with the error map populated.
    /// On success returns the values to hand to the submission boundary.
    pub fn begin_submit(&mut self) -> Result<FormValues, FormError> {
        let form = self.form.as_ref().ok_or(FormError::NotBound)?;
        if self.state == FormState::Submitting {
            return Err(FormError::SubmissionInFlight {
                form: form.name.clone(),
            });
        }

        self.state = FormState::Submitting;
        self.message = None;

        let report = validate_form(&form.fields, &self.values);
        self.errors = report.errors;
        if !report.is_valid {
            self.state = FormState::Ready;
            return Err(FormError::ValidationFailed {
                form: form.name.clone(),
                count: self.errors.len(),
            });
        }

        Ok(self.values.clone())
    }

    /// Finish the in-flight submission with the boundary's outcome. Values
    /// are kept either way so a failed submission can be retried.
    pub fn complete_submit(&mut self, outcome: Result<(), SubmitError>) -> Result<(), FormError> {
        let form = self.form_name().to_string();
        if self.state != FormState::Submitting {
            return Err(FormError::NotSubmitting { form });
        }

        match outcome {
            Ok(()) => {
                self.state = FormState::Submitted;
                self.message = Some(SubmitMessage::Success(SUBMIT_SUCCESS_MESSAGE.to_string()));
                tracing::info!(form = %form, fields = self.values.len(), "form submitted");
                Ok(())
            }
            Err(source) => {
                self.state = FormState::Ready;
                self.message = Some(SubmitMessage::Failure(SUBMIT_FAILURE_MESSAGE.to_string()));
                tracing::warn!(form = %form, error = %source, "submission failed");
                Err(FormError::SubmissionFailed { form, source })
            }
        }
    }

    /// Validate and hand the values to `submitter` in one step.
    pub fn submit<S: Submitter + ?Sized>(&mut self, submitter: &mut S) -> Result<(), FormError> {
        let values = self.begin_submit()?;
        let outcome = submitter.submit(self.form_name(), &values);
        self.complete_submit(outcome)
    }
}

fn wrong_kind(field: &FieldSpec, expected: &'static str) -> FormError {
    FormError::WrongFieldKind {
        field: field.name.clone(),
        expected,
        actual: field.field_type.clone(),
    }
}

fn out_of_bounds(name: &str, index: usize) -> FormError {
    FormError::IndexOutOfBounds {
        field: name.to_string(),
        index,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::test_utils::*;

    fn scenario_form() -> FormSpec {
        FormSpec::new("scenario", "Scenario").with_fields(vec![
            text_field("id").with_required(),
            number_field("count", 1.0, 5.0),
        ])
    }

    fn controller_for(form: FormSpec) -> FormController {
        let schema = Arc::new(Schema::new(vec![form.clone()]));
        let mut c = FormController::new(schema);
        c.bind(form).unwrap();
        c
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    #[test]
    fn starts_uninitialized() {
        let mut c = FormController::new(Arc::new(Schema::default()));
        assert_eq!(c.state(), FormState::Uninitialized);
        assert_eq!(c.change_field("x", Value::Null), Err(FormError::NotBound));
        assert_eq!(c.begin_submit(), Err(FormError::NotBound));
    }

    #[test]
    fn bind_derives_initial_values() {
        let form = FormSpec::new("f", "F").with_fields(vec![
            text_field("name"),
            text_field("callsign").with_default("alpha"),
            FieldSpec::new("armed", "Armed", FieldType::Boolean),
            list_field("rows", vec![text_field("x").with_default("seed")]),
            assembly_field("one", "weapon", false),
            assembly_field("many", "sensor", true),
            number_array_field("xs"),
            group_field("g", vec![]),
        ]);
        let c = controller_for(form);
        assert_eq!(c.state(), FormState::Ready);
        assert_eq!(c.value("name"), None);
        assert_eq!(c.value("callsign"), Some(&Value::from("alpha")));
        assert_eq!(c.value("armed"), Some(&Value::Bool(false)));
        assert_eq!(
            c.value("rows"),
            Some(&Value::List(vec![row(&[("x", "seed".into())])]))
        );
        assert_eq!(c.value("one"), None);
        assert_eq!(c.value("many"), Some(&Value::empty_list()));
        assert_eq!(c.value("xs"), Some(&Value::empty_list()));
        assert_eq!(c.value("g"), Some(&Value::empty_map()));
        assert!(c.errors().is_empty());
    }

    #[test]
    fn rebinding_discards_previous_state() {
        let form_a =
            FormSpec::new("a", "A").with_fields(vec![text_field("only_a").with_required()]);
        let form_b = FormSpec::new("b", "B").with_fields(vec![text_field("only_b")]);
        let mut c = controller_for(form_a);
        c.change_field("only_a", Value::from("stale")).unwrap();
        let _ = c.begin_submit();

        c.bind(form_b).unwrap();
        assert_eq!(c.value("only_a"), None);
        assert!(c.errors().is_empty());
        assert!(c.message().is_none());
        assert_eq!(c.form_name(), "b");
        assert!(matches!(
            c.change_field("only_a", Value::from("x")),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn bind_named_looks_up_schema() {
        let schema = Arc::new(Schema::new(vec![scenario_form()]));
        let mut c = FormController::new(schema);
        c.bind_named("scenario").unwrap();
        assert_eq!(c.form_name(), "scenario");
        assert_eq!(
            c.bind_named("missing"),
            Err(FormError::UnknownForm {
                name: "missing".to_string()
            })
        );
    }

    // -----------------------------------------------------------------------
    // change_field
    // -----------------------------------------------------------------------

    #[test]
    fn change_field_validates_only_that_field() {
        let mut c = controller_for(scenario_form());
        c.change_field("count", Value::from(9.0)).unwrap();
        assert!(matches!(c.error("count"), Some(FieldError::OutOfRange { .. })));
        // "id" is required and empty, but was not touched
        assert!(c.error("id").is_none());

        c.change_field("count", Value::from(2.0)).unwrap();
        assert!(c.error("count").is_none());
    }

    #[test]
    fn last_write_wins() {
        let mut c = controller_for(scenario_form());
        c.change_field("id", Value::from("")).unwrap();
        assert!(c.error("id").is_some());
        c.change_field("id", Value::from("x")).unwrap();
        assert!(c.error("id").is_none());
        assert_eq!(c.value("id"), Some(&Value::from("x")));
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    #[test]
    fn submit_scenario() {
        let mut c = controller_for(scenario_form());
        let mut submitter = RecordingSubmitter::default();

        c.change_field("id", Value::from("")).unwrap();
        c.change_field("count", Value::from(3.0)).unwrap();
        let err = c.submit(&mut submitter).unwrap_err();
        assert!(matches!(err, FormError::ValidationFailed { count: 1, .. }));
        assert_eq!(c.state(), FormState::Ready);
        assert_eq!(c.errors().keys().collect::<Vec<_>>(), vec!["id"]);

        c.change_field("id", Value::from("x")).unwrap();
        c.change_field("count", Value::from(7.0)).unwrap();
        assert!(c.submit(&mut submitter).is_err());
        assert_eq!(c.errors().keys().collect::<Vec<_>>(), vec!["count"]);

        c.change_field("count", Value::from(3.0)).unwrap();
        c.submit(&mut submitter).unwrap();
        assert_eq!(c.state(), FormState::Submitted);
        assert!(c.errors().is_empty());
        assert!(c.message().unwrap().is_success());
        assert_eq!(submitter.submissions.len(), 1);
        assert_eq!(submitter.submissions[0].0, "scenario");
    }

    #[test]
    fn resubmission_while_submitting_is_rejected() {
        let mut c = controller_for(scenario_form());
        c.change_field("id", Value::from("x")).unwrap();
        let values = c.begin_submit().unwrap();
        assert_eq!(values.get("id"), Some(&Value::from("x")));
        assert_eq!(c.state(), FormState::Submitting);

        assert_eq!(
            c.begin_submit(),
            Err(FormError::SubmissionInFlight {
                form: "scenario".to_string()
            })
        );
        assert!(matches!(
            c.bind(scenario_form()),
            Err(FormError::SubmissionInFlight { .. })
        ));

        c.complete_submit(Ok(())).unwrap();
        assert_eq!(c.state(), FormState::Submitted);
    }

    #[test]
    fn failed_submission_preserves_values() {
        let mut c = controller_for(scenario_form());
        c.change_field("id", Value::from("x")).unwrap();
        let mut submitter = FailingSubmitter::new("backend unavailable");

        let err = c.submit(&mut submitter).unwrap_err();
        assert!(matches!(err, FormError::SubmissionFailed { .. }));
        assert_eq!(c.state(), FormState::Ready);
        assert_eq!(c.value("id"), Some(&Value::from("x")));
        let message = c.message().unwrap();
        assert!(!message.is_success());
        assert_eq!(message.text(), SUBMIT_FAILURE_MESSAGE);
    }

    #[test]
    fn complete_without_begin_is_an_error() {
        let mut c = controller_for(scenario_form());
        assert!(matches!(
            c.complete_submit(Ok(())),
            Err(FormError::NotSubmitting { .. })
        ));
    }

    #[test]
    fn editing_after_success_returns_to_ready() {
        let mut c = controller_for(scenario_form());
        c.change_field("id", Value::from("x")).unwrap();
        c.submit(&mut RecordingSubmitter::default()).unwrap();
        c.change_field("id", Value::from("y")).unwrap();
        assert_eq!(c.state(), FormState::Ready);
    }

    // -----------------------------------------------------------------------
    // Lists, arrays, groups
    // -----------------------------------------------------------------------

    fn nested_form() -> FormSpec {
        FormSpec::new("n", "Nested").with_fields(vec![
            list_field(
                "rows",
                vec![
                    text_field("name").with_required(),
                    number_field("qty", 0.0, 9.0).with_default(1.0),
                ],
            ),
            number_array_field("xs"),
            group_field("pos", vec![number_field("lat", -90.0, 90.0)]),
            text_field("plain"),
        ])
    }

    #[test]
    fn list_rows_add_edit_remove() {
        let mut c = controller_for(nested_form());
        assert_eq!(c.add_item("rows").unwrap(), 2);
        let rows = c.value("rows").unwrap().as_list().unwrap();
        assert_eq!(rows[1], row(&[("qty", 1.0.into())]));

        c.set_item_field("rows", 1, "name", Value::from("b")).unwrap();
        // the first row still lacks its required name
        assert!(matches!(
            c.error("rows"),
            Some(FieldError::ItemInvalid { index: 1, .. })
        ));
        c.set_item_field("rows", 0, "name", Value::from("a")).unwrap();
        assert!(c.error("rows").is_none());

        assert_eq!(c.remove_item("rows", 0), Ok(true));
        assert_eq!(c.remove_item("rows", 0), Ok(false));
        assert_eq!(c.value("rows").unwrap().as_list().unwrap().len(), 1);
        assert!(matches!(
            c.remove_item("rows", 5),
            Err(FormError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn set_item_field_rejects_unknown_member() {
        let mut c = controller_for(nested_form());
        assert!(matches!(
            c.set_item_field("rows", 0, "nope", Value::Null),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn number_array_entries() {
        let mut c = controller_for(nested_form());
        assert_eq!(c.add_item("xs").unwrap(), 1);
        assert_eq!(c.error("xs"), Some(&FieldError::NotANumber { element: Some(1) }));
        c.set_item("xs", 0, Value::from(4.0)).unwrap();
        assert!(c.error("xs").is_none());
        assert_eq!(c.remove_item("xs", 0), Ok(false));
    }

    #[test]
    fn group_members() {
        let mut c = controller_for(nested_form());
        c.set_group_field("pos", "lat", Value::from(120.0)).unwrap();
        assert!(matches!(c.error("pos"), Some(FieldError::MemberInvalid { .. })));
        c.set_group_field("pos", "lat", Value::from(45.0)).unwrap();
        assert!(c.error("pos").is_none());
        assert_eq!(
            c.value("pos").unwrap().as_map().unwrap().get("lat"),
            Some(&Value::Number(45.0))
        );
    }

    #[test]
    fn structural_edits_check_field_kind() {
        let mut c = controller_for(nested_form());
        assert!(matches!(c.add_item("plain"), Err(FormError::WrongFieldKind { .. })));
        assert!(matches!(
            c.set_group_field("rows", "name", Value::Null),
            Err(FormError::WrongFieldKind { .. })
        ));
        assert!(matches!(
            c.reference_options("plain"),
            Err(FormError::WrongFieldKind { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    fn assembly_schema() -> (Arc<Schema>, FormSpec) {
        let host = FormSpec::new("platform_1", "Platform").with_fields(vec![
            assembly_field("sensors", "sensor", true),
            assembly_field("weapon", "weapon", false).with_required(),
        ]);
        let schema = Arc::new(Schema::new(vec![
            host.clone(),
            typed_form("radar", "sensor"),
            typed_form("gun", "weapon"),
            typed_form("eo", "sensor"),
        ]));
        (schema, host)
    }

    #[test]
    fn assembly_options_follow_schema() {
        let (schema, host) = assembly_schema();
        let mut c = FormController::new(schema);
        c.bind(host).unwrap();
        let names: Vec<String> = c
            .reference_options("sensors")
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["radar", "eo"]);
    }

    #[test]
    fn assembly_click_and_remove() {
        let (schema, host) = assembly_schema();
        let mut c = FormController::new(schema);
        c.bind(host).unwrap();

        c.select_reference("sensors", "radar").unwrap();
        c.select_reference("sensors", "eo").unwrap();
        c.select_reference("sensors", "radar").unwrap();
        assert_eq!(c.value("sensors"), Some(&Value::List(vec!["eo".into()])));

        assert_eq!(c.remove_reference("sensors", "eo"), Ok(true));
        assert_eq!(c.value("sensors"), Some(&Value::empty_list()));

        c.select_reference("weapon", "gun").unwrap();
        assert_eq!(c.value("weapon"), Some(&Value::from("gun")));
        assert!(c.error("weapon").is_none());
    }

    #[test]
    fn assembly_drop_rules() {
        let (schema, host) = assembly_schema();
        let mut c = FormController::new(schema.clone());
        c.bind(host).unwrap();

        let gun = DragPayload::from_form(schema.get("gun").unwrap(), 2).unwrap();
        let before = c.values().clone();
        assert_eq!(c.drop_reference("sensors", &gun), Ok(DropOutcome::Rejected));
        assert_eq!(c.values(), &before);
        assert!(c.errors().is_empty());

        let radar = DragPayload::from_form(schema.get("radar").unwrap(), 1).unwrap();
        assert_eq!(c.drop_reference("sensors", &radar), Ok(DropOutcome::Added));
        assert_eq!(
            c.drop_reference("sensors", &radar),
            Ok(DropOutcome::AlreadyPresent)
        );
        assert_eq!(c.value("sensors"), Some(&Value::List(vec!["radar".into()])));
    }

    // -----------------------------------------------------------------------
    // Raw code
    // -----------------------------------------------------------------------

    #[test]
    fn raw_code_echo() {
        let mut form = scenario_form();
        form.raw_code = Some("form:\n  name: scenario\n".to_string());
        let mut c = controller_for(form);
        assert!(!c.raw_code_shown());
        assert!(c.toggle_raw_code());
        assert!(c.raw_code().starts_with("form:"));

        c.bind(scenario_form()).unwrap();
        assert!(!c.raw_code_shown());
        assert_eq!(c.raw_code(), "");
    }
}
