//! Cross-crate tests: schema documents loaded by `formwork-data` driving
//! `formwork-core` controllers from bind through submission.

use std::path::Path;
use std::sync::Arc;

use formwork_core::controller::{FormController, FormState};
use formwork_core::error::{FieldError, FormError};
use formwork_core::gallery::FormGallery;
use formwork_core::reference::{DragPayload, DropOutcome};
use formwork_core::registry::InputBehavior;
use formwork_core::test_utils::*;
use formwork_core::value::Value;
use formwork_core::view::DragState;
use formwork_data::{load_schema, parse_schema, Format, SchemaLoadError};

const DEMO_SCHEMA: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../formwork-demo/schemas/forms.yaml"
);

const LOGIN_JSON: &str = r#"{
  "forms": [
    {"form": {
      "name": "login",
      "title": "Login",
      "fields": [
        {"name": "email", "label": "Email", "type": "email", "validation": {"required": true}},
        {"name": "password", "label": "Password", "type": "password", "required": true,
         "validation": {"min_length": 8}},
        {"name": "remember", "label": "Remember me", "type": "checkbox", "default": false}
      ]
    }},
    {"form": {
      "name": "survey",
      "title": "Survey",
      "fields": [
        {"name": "score", "label": "Score", "type": "number", "validation": {"min": 1, "max": 5}}
      ]
    }}
  ]
}"#;

fn demo_schema() -> Arc<formwork_core::schema::Schema> {
    Arc::new(load_schema(Path::new(DEMO_SCHEMA)).unwrap())
}

// ===========================================================================
// Login form
// ===========================================================================

#[test]
fn login_form_validates_then_submits() {
    let schema = Arc::new(parse_schema(LOGIN_JSON, Format::Json).unwrap());
    let mut form = FormController::new(schema);
    form.bind_named("login").unwrap();
    assert_eq!(form.value("remember"), Some(&Value::Bool(false)));

    let mut backend = RecordingSubmitter::default();
    let err = form.submit(&mut backend).unwrap_err();
    assert!(matches!(err, FormError::ValidationFailed { count: 2, .. }));
    assert_eq!(form.error("email").unwrap().to_string(), "Email is required");

    form.change_field("email", Value::from("not-an-email")).unwrap();
    assert_eq!(
        form.error("email").unwrap().to_string(),
        "enter a valid email address"
    );
    form.change_field("email", Value::from("ops@example.org")).unwrap();
    form.change_field("password", Value::from("short")).unwrap();
    assert!(matches!(
        form.error("password"),
        Some(FieldError::LengthViolation { .. })
    ));
    form.change_field("password", Value::from("long enough")).unwrap();

    form.submit(&mut backend).unwrap();
    assert_eq!(form.state(), FormState::Submitted);
    let (name, values) = &backend.submissions[0];
    assert_eq!(name, "login");
    assert_eq!(values.get("email"), Some(&Value::from("ops@example.org")));
}

#[test]
fn rebinding_to_another_form_starts_clean() {
    let schema = Arc::new(parse_schema(LOGIN_JSON, Format::Json).unwrap());
    let mut form = FormController::new(schema);
    form.bind_named("login").unwrap();
    form.change_field("email", Value::from("x")).unwrap();
    assert!(form.error("email").is_some());

    form.bind_named("survey").unwrap();
    assert!(form.values().is_empty());
    assert!(form.errors().is_empty());
    assert_eq!(form.state(), FormState::Ready);

    form.change_field("score", Value::from(9.0)).unwrap();
    assert_eq!(
        form.error("score").unwrap().to_string(),
        "value must not be greater than 5"
    );
}

// ===========================================================================
// Demo schema
// ===========================================================================

#[test]
fn demo_schema_loads_and_resolves() {
    let schema = demo_schema();
    let mut platform = FormController::new(schema.clone());
    platform.bind_named("platform_1").unwrap();

    let sensors: Vec<String> = platform
        .reference_options("sensors")
        .unwrap()
        .into_iter()
        .map(|o| o.name)
        .collect();
    assert_eq!(sensors, vec!["radar_1", "eo_1"]);
    assert!(platform.raw_code().contains("callsign: FFG-01"));

    let view = platform.view(&DragState::idle()).unwrap();
    let behaviors: Vec<InputBehavior> = view.fields.iter().map(|f| f.resolved.behavior).collect();
    assert!(behaviors.contains(&InputBehavior::ReferencePicker));
    assert!(behaviors.contains(&InputBehavior::GroupEditor));
}

#[test]
fn radar_list_rows_are_seeded_from_defaults() {
    let mut radar = FormController::new(demo_schema());
    radar.bind_named("radar_1").unwrap();
    assert_eq!(
        radar.value("modes"),
        Some(&Value::List(vec![row(&[("mode", "search".into())])]))
    );
    assert_eq!(radar.value("range"), Some(&Value::Number(120.0)));

    radar.set_item_field("modes", 0, "dwell", Value::from(80.0)).unwrap();
    let err = radar.error("modes").unwrap();
    assert_eq!(
        err.to_string(),
        "item 1 (Dwell): value must not be greater than 50"
    );
    assert_eq!(radar.remove_item("modes", 0), Ok(false));
}

#[test]
fn gallery_drag_and_drop_across_forms() {
    let mut gallery = FormGallery::new(demo_schema());
    assert!(gallery.begin_drag("gun_1").unwrap());
    assert_eq!(
        gallery.drop_on("platform_1", "sensors"),
        Ok(DropOutcome::Rejected)
    );

    gallery.begin_drag("gun_1").unwrap();
    assert_eq!(gallery.drop_on("platform_1", "weapon"), Ok(DropOutcome::Added));

    // A payload arriving through the transfer channel.
    let schema = gallery.schema().clone();
    let payload = DragPayload::from_form(schema.get("eo_1").unwrap(), 1).unwrap();
    let transferred = DragPayload::from_transfer(&payload.to_transfer().unwrap()).unwrap();
    gallery.begin_drag_payload(transferred);
    assert_eq!(gallery.drop_on("platform_1", "sensors"), Ok(DropOutcome::Added));

    let platform = gallery.controller("platform_1").unwrap();
    assert_eq!(platform.value("weapon"), Some(&Value::from("gun_1")));
    assert_eq!(
        platform.value("sensors"),
        Some(&Value::List(vec!["eo_1".into()]))
    );
}

// ===========================================================================
// Load failures
// ===========================================================================

#[test]
fn malformed_schemas_are_rejected() {
    let duplicate = r#"{"forms": [{"form": {"name": "a"}}, {"form": {"name": "a"}}]}"#;
    assert!(matches!(
        parse_schema(duplicate, Format::Json),
        Err(SchemaLoadError::DuplicateForm { .. })
    ));

    let bad_regex = r#"
forms:
  - form:
      name: a
      fields:
        - name: code
          type: text
          validation:
            pattern: "[unclosed"
"#;
    assert!(matches!(
        parse_schema(bad_regex, Format::Yaml),
        Err(SchemaLoadError::InvalidPattern { .. })
    ));
}
