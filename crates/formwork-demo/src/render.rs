//! Plain-text rendering of form views for the headless demo.

use std::fmt::Write;

use formwork_core::registry::{InputBehavior, TextKind};
use formwork_core::view::{FieldView, FormView};

pub fn render_form(view: &FormView<'_>) -> String {
    let mut out = String::new();
    let kind = view.form_type.map(|t| format!(" [{t}]")).unwrap_or_default();
    let _ = writeln!(out, "{} {}{kind} ({:?})", view.icon, view.title, view.state);
    if let Some(description) = view.description {
        let _ = writeln!(out, "  {description}");
    }
    for field in &view.fields {
        render_field(&mut out, field, 1);
    }
    if let Some(message) = view.message {
        let _ = writeln!(out, "  > {}", message.text());
    }
    if let Some(raw) = view.raw_code {
        let _ = writeln!(out, "  --- raw ---");
        for line in raw.lines() {
            let _ = writeln!(out, "  | {line}");
        }
    }
    out
}

fn render_field(out: &mut String, field: &FieldView<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if field.required() { "*" } else { " " };
    let unit = field
        .resolved
        .props
        .unit
        .map(|u| format!(" ({u})"))
        .unwrap_or_default();
    let value = display(field);
    let _ = writeln!(out, "{indent}{marker} {}{unit}: {value}", field.label());

    if let Some(notice) = &field.resolved.notice {
        let _ = writeln!(out, "{indent}    ? {notice}");
    }
    if !field.options.is_empty() {
        let names: Vec<&str> = field.options.iter().map(|o| o.name.as_str()).collect();
        let hint = if field.drop_target { " (drop here)" } else { "" };
        let _ = writeln!(out, "{indent}    options: {}{hint}", names.join(", "));
    }
    for (i, row) in field.rows.iter().enumerate() {
        let _ = writeln!(out, "{indent}    #{}", i + 1);
        for sub in row {
            render_field(out, sub, depth + 3);
        }
    }
    for member in &field.members {
        render_field(out, member, depth + 2);
    }
    if let Some(error) = &field.error {
        let _ = writeln!(out, "{indent}    ! {error}");
    }
}

fn display(field: &FieldView<'_>) -> String {
    match field.resolved.behavior {
        InputBehavior::TextInput(TextKind::Password) => field
            .value
            .as_ref()
            .map(|v| "*".repeat(v.to_string().chars().count()))
            .unwrap_or_default(),
        InputBehavior::ReferencePicker => format!("[{}]", field.selected.join(", ")),
        InputBehavior::ListEditor | InputBehavior::GroupEditor => String::new(),
        InputBehavior::Placeholder => "-".to_string(),
        _ => field.value.as_ref().map(ToString::to_string).unwrap_or_default(),
    }
}
