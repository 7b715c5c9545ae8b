//! Load-time well-formedness checks for a deserialized schema.

use std::collections::HashSet;
use std::path::Path;

use formwork_core::field::{FieldSpec, FormSpec};
use formwork_core::schema::Schema;
use formwork_core::validation::compile_pattern;

use crate::loader::SchemaLoadError;

/// Reject duplicate form names, duplicate field names within any field list
/// (top-level, list `item_fields`, group `fields`), and patterns that do
/// not compile.
pub fn check_schema(schema: &Schema, file: &Path) -> Result<(), SchemaLoadError> {
    let mut forms = HashSet::new();
    for form in schema {
        if !forms.insert(form.name.as_str()) {
            return Err(SchemaLoadError::DuplicateForm {
                file: file.to_path_buf(),
                name: form.name.clone(),
            });
        }
        check_fields(form, &form.fields, "", file)?;
    }
    Ok(())
}

fn check_fields(
    form: &FormSpec,
    fields: &[FieldSpec],
    prefix: &str,
    file: &Path,
) -> Result<(), SchemaLoadError> {
    let mut seen = HashSet::new();
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaLoadError::DuplicateField {
                file: file.to_path_buf(),
                form: form.name.clone(),
                field: path,
            });
        }
        check_patterns(form, field, &path, file)?;
        check_fields(form, field.children(), &path, file)?;
    }
    Ok(())
}

fn check_patterns(
    form: &FormSpec,
    field: &FieldSpec,
    path: &str,
    file: &Path,
) -> Result<(), SchemaLoadError> {
    let Some(rules) = &field.validation else {
        return Ok(());
    };
    for pattern in [&rules.pattern, &rules.regex].into_iter().flatten() {
        compile_pattern(pattern).map_err(|e| SchemaLoadError::InvalidPattern {
            file: file.to_path_buf(),
            form: form.name.clone(),
            field: path.to_string(),
            detail: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::field::ValidationRules;
    use formwork_core::test_utils::*;

    fn check(schema: &Schema) -> Result<(), SchemaLoadError> {
        check_schema(schema, Path::new("forms.yaml"))
    }

    #[test]
    fn well_formed_schema_passes() {
        assert!(check(&platform_schema()).is_ok());
        assert!(check(&Schema::default()).is_ok());
    }

    #[test]
    fn duplicate_form_names() {
        let schema = Schema::new(vec![typed_form("a", "sensor"), typed_form("a", "weapon")]);
        assert!(matches!(
            check(&schema),
            Err(SchemaLoadError::DuplicateForm { ref name, .. }) if name == "a"
        ));
    }

    #[test]
    fn duplicate_top_level_fields() {
        let schema = Schema::new(vec![
            FormSpec::new("f", "F").with_fields(vec![text_field("x"), text_field("x")]),
        ]);
        assert!(matches!(
            check(&schema),
            Err(SchemaLoadError::DuplicateField { ref field, .. }) if field == "x"
        ));
    }

    #[test]
    fn duplicate_nested_fields_report_path() {
        let schema = Schema::new(vec![FormSpec::new("f", "F").with_fields(vec![group_field(
            "pos",
            vec![list_field("legs", vec![text_field("id"), text_field("id")])],
        )])]);
        assert!(matches!(
            check(&schema),
            Err(SchemaLoadError::DuplicateField { ref field, .. }) if field == "pos.legs.id"
        ));
    }

    #[test]
    fn same_name_in_different_lists_is_fine() {
        let schema = Schema::new(vec![FormSpec::new("f", "F").with_fields(vec![
            text_field("id"),
            list_field("rows", vec![text_field("id")]),
        ])]);
        assert!(check(&schema).is_ok());
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let bad = text_field("code").with_rules(ValidationRules {
            pattern: Some("([a-z]".to_string()),
            ..Default::default()
        });
        let schema = Schema::new(vec![FormSpec::new("f", "F").with_fields(vec![bad])]);
        assert!(matches!(
            check(&schema),
            Err(SchemaLoadError::InvalidPattern { ref field, .. }) if field == "code"
        ));

        let bad_email = FieldSpec::new("mail", "Mail", formwork_core::field::FieldType::Email)
            .with_rules(ValidationRules {
                regex: Some("*@x".to_string()),
                ..Default::default()
            });
        let schema = Schema::new(vec![FormSpec::new("f", "F").with_fields(vec![bad_email])]);
        assert!(matches!(check(&schema), Err(SchemaLoadError::InvalidPattern { .. })));
    }
}
