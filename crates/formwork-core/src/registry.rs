//! Field type registry: one table mapping each field type to its input
//! behavior, the props that behavior reads, and its initial-value strategy.
//!
//! Views, list rows and group members all go through
//! [`FieldTypeRegistry::resolve`] instead of switching on the type at each
//! call site. Hosts that need a different table (another initial value for
//! checkboxes, extra props for a behavior) start from
//! [`RegistryBuilder::standard`], adjust it with `register` / `mutate`, and
//! hand the result of `build` to a controller or gallery.

use std::collections::HashMap;

use crate::field::{FieldSpec, FieldType, SelectOption};
use crate::value::Value;

/// Text input flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    Email,
    Password,
}

/// The concrete input behavior a field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputBehavior {
    TextInput(TextKind),
    NumberInput,
    /// Checkbox-style on/off input (`boolean` and `checkbox`).
    Toggle,
    Dropdown,
    /// Repeated rows of `item_fields`.
    ListEditor,
    /// Cross-form selection by target type.
    ReferencePicker,
    NumberArrayEditor,
    /// Nested `fields` rendered inline.
    GroupEditor,
    /// Visible stand-in for an unrecognized field type.
    Placeholder,
}

/// A prop an input behavior needs from its field spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKey {
    Placeholder,
    Unit,
    Min,
    Max,
    Options,
    ItemFields,
    Target,
    Multiple,
    Members,
    Default,
}

/// Initial value derivation when the field has no `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialValue {
    /// Leave the key absent.
    Unset,
    /// One row holding only the defaulted sub-fields.
    SeedRow,
    /// Empty sequence for multi-select, absent for single-select.
    EmptyListIfMultiple,
    False,
    EmptyList,
    EmptyMap,
}

/// Registry entry for one field type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTypeDef {
    pub behavior: InputBehavior,
    pub props: Vec<PropKey>,
    pub initial: InitialValue,
}

impl FieldTypeDef {
    pub fn new(behavior: InputBehavior, props: &[PropKey], initial: InitialValue) -> Self {
        Self {
            behavior,
            props: props.to_vec(),
            initial,
        }
    }

    pub fn needs(&self, key: PropKey) -> bool {
        self.props.contains(&key)
    }
}

/// Props extracted from a field spec for its input behavior. Only the keys
/// the behavior declares are populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderProps<'a> {
    pub placeholder: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub options: &'a [SelectOption],
    pub item_fields: &'a [FieldSpec],
    pub target: Option<&'a str>,
    pub multiple: bool,
    pub members: &'a [FieldSpec],
    pub default: Option<&'a Value>,
}

/// A field resolved to its behavior and props.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    pub field: &'a FieldSpec,
    pub behavior: InputBehavior,
    pub props: RenderProps<'a>,
    /// Set for [`InputBehavior::Placeholder`].
    pub notice: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("field type '{0}' is not registered")]
    NotFound(FieldType),
    #[error("cannot register unknown field type '{0}'")]
    UnknownType(FieldType),
    #[error("field type '{0}' has no definition")]
    Missing(FieldType),
}

/// Builder for constructing an immutable [`FieldTypeRegistry`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: HashMap<FieldType, FieldTypeDef>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-populated with the built-in table.
    pub fn standard() -> Self {
        use InputBehavior as B;
        use PropKey as P;

        let mut b = Self::new();
        let text_props = [P::Placeholder];
        b.insert(
            FieldType::Text,
            FieldTypeDef::new(B::TextInput(TextKind::Plain), &text_props, InitialValue::Unset),
        );
        b.insert(
            FieldType::Email,
            FieldTypeDef::new(B::TextInput(TextKind::Email), &text_props, InitialValue::Unset),
        );
        b.insert(
            FieldType::Password,
            FieldTypeDef::new(B::TextInput(TextKind::Password), &text_props, InitialValue::Unset),
        );
        b.insert(
            FieldType::Number,
            FieldTypeDef::new(
                B::NumberInput,
                &[P::Placeholder, P::Unit, P::Min, P::Max],
                InitialValue::Unset,
            ),
        );
        b.insert(
            FieldType::Boolean,
            FieldTypeDef::new(B::Toggle, &[], InitialValue::False),
        );
        b.insert(
            FieldType::Checkbox,
            FieldTypeDef::new(B::Toggle, &[P::Default], InitialValue::Unset),
        );
        b.insert(
            FieldType::Select,
            FieldTypeDef::new(B::Dropdown, &[P::Options, P::Default], InitialValue::Unset),
        );
        b.insert(
            FieldType::List,
            FieldTypeDef::new(B::ListEditor, &[P::ItemFields], InitialValue::SeedRow),
        );
        b.insert(
            FieldType::Assembly,
            FieldTypeDef::new(
                B::ReferencePicker,
                &[P::Target, P::Multiple],
                InitialValue::EmptyListIfMultiple,
            ),
        );
        b.insert(
            FieldType::NumberArray,
            FieldTypeDef::new(
                B::NumberArrayEditor,
                &[P::Unit, P::Default],
                InitialValue::EmptyList,
            ),
        );
        b.insert(
            FieldType::Group,
            FieldTypeDef::new(B::GroupEditor, &[P::Members], InitialValue::EmptyMap),
        );
        b
    }

    fn insert(&mut self, ty: FieldType, def: FieldTypeDef) {
        self.defs.insert(ty, def);
    }

    /// Phase 1: Register (or replace) the definition of a known type.
    pub fn register(&mut self, ty: FieldType, def: FieldTypeDef) -> Result<(), RegistryError> {
        if !ty.is_known() {
            return Err(RegistryError::UnknownType(ty));
        }
        self.insert(ty, def);
        Ok(())
    }

    /// Phase 2: Mutate an existing definition.
    pub fn mutate<F>(&mut self, ty: &FieldType, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut FieldTypeDef),
    {
        let def = self
            .defs
            .get_mut(ty)
            .ok_or_else(|| RegistryError::NotFound(ty.clone()))?;
        f(def);
        Ok(())
    }

    /// Phase 3: Finalize. Every known type must have a definition.
    pub fn build(self) -> Result<FieldTypeRegistry, RegistryError> {
        if let Some(missing) = FieldType::KNOWN.into_iter().find(|ty| !self.defs.contains_key(ty)) {
            return Err(RegistryError::Missing(missing));
        }
        Ok(FieldTypeRegistry { defs: self.defs })
    }
}

/// Immutable type table: `type -> (behavior, props, initial value)`.
#[derive(Debug, Clone)]
pub struct FieldTypeRegistry {
    defs: HashMap<FieldType, FieldTypeDef>,
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FieldTypeRegistry {
    /// The built-in table.
    pub fn standard() -> Self {
        Self {
            defs: RegistryBuilder::standard().defs,
        }
    }

    pub fn get(&self, ty: &FieldType) -> Option<&FieldTypeDef> {
        self.defs.get(ty)
    }

    /// Resolve a field to its input behavior and props. Never fails: an
    /// unrecognized type resolves to [`InputBehavior::Placeholder`].
    pub fn resolve<'a>(&self, field: &'a FieldSpec) -> ResolvedField<'a> {
        let Some(def) = self.get(&field.field_type) else {
            tracing::warn!(
                field = %field.name,
                field_type = %field.field_type,
                "unknown field type"
            );
            return ResolvedField {
                field,
                behavior: InputBehavior::Placeholder,
                props: RenderProps::default(),
                notice: Some(format!("unknown field type: {}", field.field_type)),
            };
        };

        let rules = field.validation.as_ref();
        let mut props = RenderProps::default();
        for key in &def.props {
            match key {
                PropKey::Placeholder => props.placeholder = field.placeholder.as_deref(),
                PropKey::Unit => props.unit = field.unit.as_deref(),
                PropKey::Min => props.min = rules.and_then(|r| r.min),
                PropKey::Max => props.max = rules.and_then(|r| r.max),
                PropKey::Options => props.options = &field.options,
                PropKey::ItemFields => props.item_fields = &field.item_fields,
                PropKey::Target => props.target = field.target.as_deref(),
                PropKey::Multiple => props.multiple = field.multiple,
                PropKey::Members => props.members = &field.fields,
                PropKey::Default => props.default = field.default.as_ref(),
            }
        }

        ResolvedField {
            field,
            behavior: def.behavior,
            props,
            notice: None,
        }
    }

    /// Initial value of a field on bind. `None` leaves the key absent.
    ///
    /// A declared `default` always wins; otherwise the type's strategy
    /// applies.
    pub fn initial_value(&self, field: &FieldSpec) -> Option<Value> {
        if let Some(default) = &field.default {
            return Some(default.clone());
        }
        let strategy = self.get(&field.field_type).map_or(InitialValue::Unset, |d| d.initial);
        match strategy {
            InitialValue::Unset => None,
            InitialValue::SeedRow => Some(Value::List(vec![seed_row(&field.item_fields)])),
            InitialValue::EmptyListIfMultiple => field.multiple.then(Value::empty_list),
            InitialValue::False => Some(Value::Bool(false)),
            InitialValue::EmptyList => Some(Value::empty_list()),
            InitialValue::EmptyMap => Some(Value::empty_map()),
        }
    }
}

/// A fresh list row: only sub-fields with a declared default are populated.
pub fn seed_row(item_fields: &[FieldSpec]) -> Value {
    Value::Map(
        item_fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.name.clone(), d)))
            .collect(),
    )
}
