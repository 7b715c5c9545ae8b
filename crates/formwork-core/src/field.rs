//! Declarative field and form definitions.
//!
//! These are the in-memory shape of a schema after loading. They are plain
//! serde structs; the loader in `formwork-data` produces them and the rest of
//! the engine only ever reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

// ===========================================================================
// Field types
// ===========================================================================

/// The declared type of a field.
///
/// Serialized as its string tag. Tags the engine does not recognize are kept
/// verbatim in [`FieldType::Unknown`] so the form still renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Boolean,
    Checkbox,
    Select,
    List,
    Assembly,
    NumberArray,
    Group,
    Unknown(String),
}

impl FieldType {
    /// Every recognized type, in glossary order.
    pub const KNOWN: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Password,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Checkbox,
        FieldType::Select,
        FieldType::List,
        FieldType::Assembly,
        FieldType::NumberArray,
        FieldType::Group,
    ];

    /// The schema tag for this type.
    pub fn tag(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::List => "list",
            FieldType::Assembly => "assembly",
            FieldType::NumberArray => "number[]",
            FieldType::Group => "group",
            FieldType::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unknown(_))
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "password" => FieldType::Password,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "checkbox" => FieldType::Checkbox,
            "select" => FieldType::Select,
            "list" => FieldType::List,
            "assembly" => FieldType::Assembly,
            "number[]" => FieldType::NumberArray,
            "group" => FieldType::Group,
            other => FieldType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from(tag.as_str())
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ===========================================================================
// Validation rules
// ===========================================================================

/// Optional rule bag attached to a field. Which keys matter depends on the
/// field type; unrelated keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub required: bool,
    /// Overrides the field label in "is required" messages.
    pub label: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// Text pattern (unanchored regex search).
    pub pattern: Option<String>,
    /// Email format override (unanchored regex search).
    pub regex: Option<String>,
    /// Replaces the default format message.
    pub error_message: Option<String>,
}

// ===========================================================================
// Select options
// ===========================================================================

/// A select option: either a bare string (value and label coincide) or an
/// explicit `{value, label}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl SelectOption {
    pub fn value(&self) -> &str {
        match self {
            SelectOption::Plain(v) => v,
            SelectOption::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SelectOption::Plain(v) => v,
            SelectOption::Labeled { label, .. } => label,
        }
    }
}

// ===========================================================================
// Field spec
// ===========================================================================

/// Declarative description of one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl FieldSpec {
    /// Create a field with no rules, default or type-specific extras.
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            validation: None,
            default: None,
            placeholder: None,
            unit: None,
            options: Vec::new(),
            item_fields: Vec::new(),
            target: None,
            multiple: false,
            fields: Vec::new(),
        }
    }

    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_item_fields(mut self, item_fields: Vec<FieldSpec>) -> Self {
        self.item_fields = item_fields;
        self
    }

    pub fn with_members(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_target(mut self, target: &str, multiple: bool) -> Self {
        self.target = Some(target.to_string());
        self.multiple = multiple;
        self
    }

    /// Required either on the field itself or inside its rule bag.
    pub fn is_required(&self) -> bool {
        self.required || self.validation.as_ref().is_some_and(|r| r.required)
    }

    /// Label used in "is required" messages.
    pub fn display_label(&self) -> &str {
        let override_label = self.validation.as_ref().and_then(|r| r.label.as_deref());
        match override_label {
            Some(label) if !label.is_empty() => label,
            _ if !self.label.is_empty() => &self.label,
            _ => "This field",
        }
    }

    /// Nested field list for container types (`list` rows, `group` members).
    pub fn children(&self) -> &[FieldSpec] {
        match self.field_type {
            FieldType::List => &self.item_fields,
            FieldType::Group => &self.fields,
            _ => &[],
        }
    }
}

// ===========================================================================
// Form spec
// ===========================================================================

/// One schema-defined form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tag matched against assembly `target`s and used for icon/color lookup.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_code: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormSpec {
    pub fn new(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: None,
            form_type: None,
            raw_code: None,
            fields: Vec::new(),
        }
    }

    pub fn with_type(mut self, form_type: &str) -> Self {
        self.form_type = Some(form_type.to_string());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Title, falling back to the form name when blank.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}
