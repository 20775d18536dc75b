use askama::Template;

use crate::completion::{CompletionDisplaySnapshot, CompletionFieldSet, FieldErrors, FieldKind};
use super::PageContext;

/// One option of a select, with its selected state resolved.
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A completion form field flattened for the template.
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: String, // "select", "checkbox", "text", "datetime", "hidden", "button", "static"
    pub value: String,
    pub checked: bool,
    pub options: Vec<OptionView>,
    pub text: String,
    pub help: String,
    pub frozen: bool,
    pub hide_if: String,     // JSON, read by the form script
    pub disabled_if: String, // JSON
    pub error: Option<String>,
}

impl FieldView {
    pub fn from_field_set(set: &CompletionFieldSet, errors: &FieldErrors) -> Vec<FieldView> {
        set.fields()
            .iter()
            .map(|field| {
                let value = set.effective_value(&field.name).unwrap_or("").to_string();
                let (kind, text) = match &field.kind {
                    FieldKind::Select { .. } => ("select", String::new()),
                    FieldKind::Checkbox { description } => ("checkbox", description.clone()),
                    FieldKind::Text => ("text", String::new()),
                    FieldKind::DateTimeSelector { .. } => ("datetime", String::new()),
                    FieldKind::Hidden => ("hidden", String::new()),
                    FieldKind::NoSubmitButton => ("button", String::new()),
                    FieldKind::Static { text } => ("static", text.clone()),
                };
                let options = field
                    .options()
                    .iter()
                    .map(|o| OptionView {
                        value: o.value.clone(),
                        label: o.label.clone(),
                        selected: o.value == value,
                    })
                    .collect();
                FieldView {
                    name: field.name.clone(),
                    label: field.label.clone(),
                    kind: kind.to_string(),
                    checked: !value.is_empty() && value != "0",
                    value,
                    options,
                    text,
                    help: field.help.clone().unwrap_or_default(),
                    frozen: field.frozen,
                    hide_if: serde_json::to_string(&field.hide_if).unwrap_or_default(),
                    disabled_if: serde_json::to_string(&field.disabled_if).unwrap_or_default(),
                    error: errors.get(&field.name).cloned(),
                }
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "completion/form.html")]
pub struct CompletionFormTemplate {
    pub ctx: PageContext,
    pub course_name: String,
    pub activity_name: String,
    pub form_action: String,
    pub fields: Vec<FieldView>,
    pub locked: bool,
}

#[derive(Template)]
#[template(path = "completion/info.html")]
pub struct CompletionInfoTemplate {
    pub activity_name: String,
    pub info: CompletionDisplaySnapshot,
}
