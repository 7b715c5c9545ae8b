//! Error types.
//!
//! [`FieldError`] values are validation results: they are stored in the
//! per-form error map and shown next to the field, never propagated with `?`.
//! [`FormError`] covers controller misuse and the submission lifecycle.

use crate::field::FieldType;

// ===========================================================================
// Validation errors
// ===========================================================================

/// Which side of a numeric range was violated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Min(f64),
    Max(f64),
}

/// What was being counted in a length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    /// Characters of a text value.
    Characters,
    /// Characters of a password.
    PasswordCharacters,
    /// Rows of a list field.
    Items,
    /// Entries of a number array.
    Elements,
}

/// Which side of a length range was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    AtLeast(usize),
    AtMost(usize),
}

/// A single field's validation failure. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// Required field empty or absent. `custom` replaces the default message.
    #[error("{}", required_message(.label, .custom))]
    RequiredFieldMissing {
        label: String,
        custom: Option<String>,
    },

    /// Numeric value (or array element, 1-based) outside `[min, max]`.
    #[error("{}", range_message(.bound, .element))]
    OutOfRange { bound: Bound, element: Option<usize> },

    #[error("{}", length_message(.kind, .bound, .custom))]
    LengthViolation {
        kind: LengthKind,
        bound: LengthBound,
        custom: Option<String>,
    },

    #[error("{message}")]
    FormatMismatch { message: String },

    /// Non-numeric input where a number is required (element is 1-based).
    #[error("{}", nan_message(.element))]
    NotANumber { element: Option<usize> },

    /// A sub-field of one list row failed (index is 1-based).
    #[error("item {index} ({member}): {source}")]
    ItemInvalid {
        index: usize,
        member: String,
        source: Box<FieldError>,
    },

    /// A member of a group failed.
    #[error("{member}: {source}")]
    MemberInvalid {
        member: String,
        source: Box<FieldError>,
    },
}

fn required_message(label: &str, custom: &Option<String>) -> String {
    match custom {
        Some(custom) => custom.clone(),
        None => format!("{label} is required"),
    }
}

fn range_message(bound: &Bound, element: &Option<usize>) -> String {
    let subject = match element {
        Some(i) => format!("element {i}"),
        None => "value".to_string(),
    };
    match bound {
        Bound::Min(min) => format!("{subject} must not be less than {min}"),
        Bound::Max(max) => format!("{subject} must not be greater than {max}"),
    }
}

fn length_message(kind: &LengthKind, bound: &LengthBound, custom: &Option<String>) -> String {
    if let Some(custom) = custom {
        return custom.clone();
    }
    match (kind, bound) {
        (LengthKind::Characters, LengthBound::AtLeast(n)) => {
            format!("must be at least {n} characters long")
        }
        (LengthKind::Characters, LengthBound::AtMost(n)) => {
            format!("must be at most {n} characters long")
        }
        (LengthKind::PasswordCharacters, LengthBound::AtLeast(n)) => {
            format!("password must be at least {n} characters")
        }
        (LengthKind::PasswordCharacters, LengthBound::AtMost(n)) => {
            format!("password must be at most {n} characters")
        }
        (LengthKind::Items, LengthBound::AtLeast(n)) => format!("at least {n} items are required"),
        (LengthKind::Items, LengthBound::AtMost(n)) => format!("at most {n} items are allowed"),
        (LengthKind::Elements, LengthBound::AtLeast(n)) => {
            format!("at least {n} elements are required")
        }
        (LengthKind::Elements, LengthBound::AtMost(n)) => {
            format!("at most {n} elements are allowed")
        }
    }
}

fn nan_message(element: &Option<usize>) -> String {
    match element {
        Some(i) => format!("element {i} is not a valid number"),
        None => "enter a valid number".to_string(),
    }
}

// ===========================================================================
// Submission boundary
// ===========================================================================

/// Failure reported by the external submit operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ===========================================================================
// Controller errors
// ===========================================================================

/// Errors returned by [`crate::controller::FormController`] operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// The controller has no form bound yet.
    #[error("no form is bound")]
    NotBound,

    #[error("form '{name}' not found in schema")]
    UnknownForm { name: String },

    #[error("field '{field}' not found in form '{form}'")]
    UnknownField { form: String, field: String },

    /// The operation does not apply to this field's type.
    #[error("field '{field}' has type '{actual}', expected {expected}")]
    WrongFieldKind {
        field: String,
        expected: &'static str,
        actual: FieldType,
    },

    /// Index outside the current sequence.
    #[error("field '{field}' has no entry at index {index}")]
    IndexOutOfBounds { field: String, index: usize },

    /// A second submission was attempted while one is in flight.
    #[error("a submission is already in flight for form '{form}'")]
    SubmissionInFlight { form: String },

    /// `complete_submit` without a preceding `begin_submit`.
    #[error("form '{form}' has no submission in flight")]
    NotSubmitting { form: String },

    #[error("form '{form}' has {count} invalid field(s)")]
    ValidationFailed { form: String, count: usize },

    #[error("submission of form '{form}' failed: {source}")]
    SubmissionFailed { form: String, source: SubmitError },
}
