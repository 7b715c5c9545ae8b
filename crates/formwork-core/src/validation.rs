//! Validation engine: maps (field, value) to an error or nothing.
//!
//! Every function here is pure. Dispatch is by field type; each type reads
//! only the rule keys that apply to it. An empty or absent value passes
//! unless the field is required, in which case it fails with
//! [`FieldError::RequiredFieldMissing`] before any other rule is consulted.
//!
//! `list` rows and `group` members are validated recursively: the first
//! failing nested field is reported on the container field, wrapped in
//! [`FieldError::ItemInvalid`] / [`FieldError::MemberInvalid`].

use fancy_regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{Bound, FieldError, LengthBound, LengthKind};
use crate::field::{FieldSpec, FieldType, ValidationRules};
use crate::value::{FormValues, Value};

/// Per-field errors of one form. An absent key means the field is valid.
pub type ValidationErrors = BTreeMap<String, FieldError>;

/// Fallback email format when the rule bag carries no `regex`.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Result of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: ValidationErrors,
}

// ===========================================================================
// Entry points
// ===========================================================================

/// Validate one field's value against its declared type and rules.
pub fn validate_field(field: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    let default_rules = ValidationRules::default();
    let rules = field.validation.as_ref().unwrap_or(&default_rules);

    match &field.field_type {
        FieldType::Text => validate_text(field, rules, value),
        FieldType::Email => validate_email(field, rules, value),
        FieldType::Password => validate_password(field, rules, value),
        FieldType::Boolean | FieldType::Checkbox => validate_checkbox(field, rules, value),
        FieldType::Number => validate_number(field, rules, value),
        FieldType::Select => validate_select(field, value),
        FieldType::List => validate_list(field, rules, value),
        FieldType::Assembly => validate_assembly(field, value),
        FieldType::NumberArray => validate_number_array(field, rules, value),
        FieldType::Group => validate_group(field, value),
        FieldType::Unknown(_) => None,
    }
}

/// Validate every top-level field of a form. Fields are independent, so the
/// resulting error set does not depend on declaration order.
pub fn validate_form(fields: &[FieldSpec], values: &FormValues) -> ValidationReport {
    let errors: ValidationErrors = fields
        .iter()
        .filter_map(|field| {
            validate_field(field, values.get(&field.name)).map(|e| (field.name.clone(), e))
        })
        .collect();

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Compile a schema pattern. Exposed so the loader can reject bad patterns
/// before any value is validated.
///
/// Lookaround and backreferences are accepted, so patterns written for
/// browser-side validation (e.g. `^(?=.*[0-9]).{8,}$`) keep working.
pub fn compile_pattern(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    Regex::new(pattern)
}

// ===========================================================================
// Helpers
// ===========================================================================

fn required(field: &FieldSpec) -> FieldError {
    FieldError::RequiredFieldMissing {
        label: field.display_label().to_string(),
        custom: None,
    }
}

/// Fails with "required" if the field is required, passes otherwise.
fn required_or_pass(field: &FieldSpec) -> Option<FieldError> {
    field.is_required().then(|| required(field))
}

/// Scalar text of a value, `None` when absent, composite, or blank.
fn non_blank_text(value: Option<&Value>) -> Option<Cow<'_, str>> {
    value
        .and_then(Value::as_text)
        .filter(|text| !text.trim().is_empty())
}

/// A length rule of zero means "no rule".
fn active(limit: Option<usize>) -> Option<usize> {
    limit.filter(|n| *n > 0)
}

fn check_length(
    len: usize,
    kind: LengthKind,
    min: Option<usize>,
    max: Option<usize>,
    custom: Option<&str>,
) -> Option<FieldError> {
    let bound = match (active(min), active(max)) {
        (Some(min), _) if len < min => LengthBound::AtLeast(min),
        (_, Some(max)) if len > max => LengthBound::AtMost(max),
        _ => return None,
    };
    Some(FieldError::LengthViolation {
        kind,
        bound,
        custom: custom.map(str::to_string),
    })
}

fn check_range(n: f64, rules: &ValidationRules, element: Option<usize>) -> Option<FieldError> {
    let bound = match (rules.min, rules.max) {
        (Some(min), _) if n < min => Bound::Min(min),
        (_, Some(max)) if n > max => Bound::Max(max),
        _ => return None,
    };
    Some(FieldError::OutOfRange { bound, element })
}

fn format_mismatch(rules: &ValidationRules, default_message: &str) -> FieldError {
    FieldError::FormatMismatch {
        message: rules
            .error_message
            .clone()
            .unwrap_or_else(|| default_message.to_string()),
    }
}

/// Unanchored pattern search. A pattern that fails to compile, or whose
/// search exceeds the backtrack limit, never matches.
fn matches_pattern(pattern: &str, text: &str) -> bool {
    let re = match compile_pattern(pattern) {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!(pattern, %err, "validation pattern does not compile");
            return false;
        }
    };
    re.is_match(text).unwrap_or_else(|err| {
        tracing::warn!(pattern, %err, "validation pattern search failed");
        false
    })
}

/// First failing field of a nested field list, with the member's label.
fn first_nested_error(
    fields: &[FieldSpec],
    values: Option<&BTreeMap<String, Value>>,
) -> Option<(String, FieldError)> {
    fields.iter().find_map(|sub| {
        let value = values.and_then(|v| v.get(&sub.name));
        validate_field(sub, value).map(|e| (sub.display_label().to_string(), e))
    })
}

// ===========================================================================
// Per-type validators
// ===========================================================================

fn validate_text(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let Some(text) = non_blank_text(value) else {
        return required_or_pass(field);
    };

    let len = text.chars().count();
    let length = check_length(
        len,
        LengthKind::Characters,
        rules.min_length,
        rules.max_length,
        None,
    );
    if length.is_some() {
        return length;
    }

    if let Some(pattern) = &rules.pattern {
        if !matches_pattern(pattern, &text) {
            return Some(format_mismatch(rules, "invalid format"));
        }
    }

    None
}

fn validate_email(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let Some(text) = non_blank_text(value) else {
        return required_or_pass(field);
    };

    let pattern = rules.regex.as_deref().unwrap_or(DEFAULT_EMAIL_PATTERN);
    if !matches_pattern(pattern, &text) {
        return Some(format_mismatch(rules, "enter a valid email address"));
    }

    None
}

fn validate_password(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let Some(text) = non_blank_text(value) else {
        return required_or_pass(field);
    };

    check_length(
        text.chars().count(),
        LengthKind::PasswordCharacters,
        rules.min_length,
        None,
        rules.error_message.as_deref(),
    )
}

fn validate_checkbox(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let checked = value.is_some_and(Value::is_truthy);
    if field.is_required() && !checked {
        return Some(FieldError::RequiredFieldMissing {
            label: field.display_label().to_string(),
            custom: rules.error_message.clone(),
        });
    }
    None
}

fn validate_number(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let value = match value {
        None | Some(Value::Null) => return required_or_pass(field),
        Some(Value::Text(s)) if s.is_empty() => return required_or_pass(field),
        Some(v) => v,
    };

    let Some(n) = value.to_number() else {
        return Some(FieldError::NotANumber { element: None });
    };

    check_range(n, rules, None)
}

fn validate_select(field: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    if value.is_some_and(Value::is_truthy) {
        return None;
    }
    required_or_pass(field)
}

fn validate_list(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let rows = match value.and_then(Value::as_list) {
        Some(rows) if !rows.is_empty() => rows,
        _ => return required_or_pass(field),
    };

    let length = check_length(
        rows.len(),
        LengthKind::Items,
        rules.min_items,
        rules.max_items,
        None,
    );
    if length.is_some() {
        return length;
    }

    rows.iter().enumerate().find_map(|(i, row)| {
        first_nested_error(&field.item_fields, row.as_map()).map(|(member, source)| {
            FieldError::ItemInvalid {
                index: i + 1,
                member,
                source: Box::new(source),
            }
        })
    })
}

fn validate_assembly(field: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    if !field.is_required() {
        return None;
    }

    let present = if field.multiple {
        value
            .and_then(Value::as_list)
            .is_some_and(|names| !names.is_empty())
    } else {
        value.is_some_and(Value::is_truthy)
    };

    (!present).then(|| required(field))
}

fn validate_number_array(
    field: &FieldSpec,
    rules: &ValidationRules,
    value: Option<&Value>,
) -> Option<FieldError> {
    let entries = match value.and_then(Value::as_list) {
        Some(entries) if !entries.is_empty() => entries,
        _ => return required_or_pass(field),
    };

    for (i, entry) in entries.iter().enumerate() {
        let element = Some(i + 1);
        let Some(n) = entry.to_number() else {
            return Some(FieldError::NotANumber { element });
        };
        if let Some(e) = check_range(n, rules, element) {
            return Some(e);
        }
    }

    check_length(
        entries.len(),
        LengthKind::Elements,
        rules.min_length,
        rules.max_length,
        None,
    )
}

fn validate_group(field: &FieldSpec, value: Option<&Value>) -> Option<FieldError> {
    let Some(members) = value.and_then(Value::as_map) else {
        return required_or_pass(field);
    };

    first_nested_error(&field.fields, Some(members)).map(|(member, source)| {
        FieldError::MemberInvalid {
            member,
            source: Box::new(source),
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
