use std::fmt;

use serde::Serialize;

use super::types::SubmittedData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    UnknownField(String),
    NotASelect(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::UnknownField(name) => write!(f, "Form has no field named '{name}'"),
            FormError::NotASelect(name) => write!(f, "Field '{name}' is not a select"),
        }
    }
}

impl std::error::Error for FormError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    NotChecked,
}

/// "Hide/disable this field if `controlling_field` `operator` `value`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub controlling_field: String,
    pub operator: Operator,
    pub value: String,
}

impl Dependency {
    pub fn new(controlling_field: &str, operator: Operator, value: &str) -> Self {
        Self {
            controlling_field: controlling_field.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    pub fn not_checked(controlling_field: &str) -> Self {
        Self::new(controlling_field, Operator::NotChecked, "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Select { options: Vec<SelectOption> },
    Checkbox { description: String },
    Text,
    DateTimeSelector { optional: bool },
    Hidden,
    /// A submit button that re-displays the form instead of submitting it.
    NoSubmitButton,
    Static { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<String>,
    pub value: Option<String>,
    pub help: Option<String>,
    pub hide_if: Vec<Dependency>,
    pub disabled_if: Vec<Dependency>,
    pub frozen: bool,
}

impl FormField {
    fn new(name: &str, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.into(),
            kind,
            default: None,
            value: None,
            help: None,
            hide_if: vec![],
            disabled_if: vec![],
            frozen: false,
        }
    }

    pub fn select(name: &str, label: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::new(name, label, FieldKind::Select { options })
    }

    pub fn checkbox(name: &str, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox { description: description.into() })
    }

    pub fn text(name: &str, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn date_time(name: &str, label: impl Into<String>, optional: bool) -> Self {
        Self::new(name, label, FieldKind::DateTimeSelector { optional })
    }

    pub fn hidden(name: &str, default: &str) -> Self {
        let mut field = Self::new(name, "", FieldKind::Hidden);
        field.default = Some(default.to_string());
        field
    }

    pub fn no_submit_button(name: &str, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::NoSubmitButton)
    }

    pub fn notice(name: &str, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Static { text: text.into() })
    }

    pub fn with_help(mut self, identifier: &str) -> Self {
        self.help = Some(identifier.to_string());
        self
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }
}

/// Where the completion components put their fields.
///
/// Call order is rendering order. Operations on a field that was never
/// added are programmer errors and come back as `FormError::UnknownField`.
pub trait FormFieldSink {
    fn add_field(&mut self, field: FormField);
    fn insert_before(&mut self, field: FormField, before: &str) -> Result<(), FormError>;
    fn add_option(&mut self, name: &str, option: SelectOption) -> Result<(), FormError>;
    fn set_default(&mut self, name: &str, value: &str) -> Result<(), FormError>;
    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError>;
    fn hide_if(&mut self, name: &str, dependency: Dependency) -> Result<(), FormError>;
    fn disable_if(&mut self, name: &str, dependency: Dependency) -> Result<(), FormError>;
    fn freeze(&mut self, name: &str) -> Result<(), FormError>;
    fn remove_field(&mut self, name: &str) -> Result<(), FormError>;
    fn has_field(&self, name: &str) -> bool;
    /// Value the user submitted for `name` in this request, if any.
    fn submitted(&self, name: &str) -> Option<&str>;
}

/// In-memory, ordered field set. The handlers render it through askama.
#[derive(Debug, Clone, Default)]
pub struct CompletionFieldSet {
    fields: Vec<FormField>,
    submission: SubmittedData,
}

impl CompletionFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field set that re-displays `submission`.
    pub fn with_submission(submission: SubmittedData) -> Self {
        Self { fields: vec![], submission }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn submission(&self) -> &SubmittedData {
        &self.submission
    }

    /// Current value of a field: explicit value, else submitted, else default.
    pub fn effective_value(&self, name: &str) -> Option<&str> {
        let field = self.field(name)?;
        field
            .value
            .as_deref()
            .or_else(|| self.submission.get(name))
            .or(field.default.as_deref())
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FormField, FormError> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn position(&self, name: &str) -> Result<usize, FormError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}

impl FormFieldSink for CompletionFieldSet {
    fn add_field(&mut self, field: FormField) {
        self.fields.push(field);
    }

    fn insert_before(&mut self, field: FormField, before: &str) -> Result<(), FormError> {
        let idx = self.position(before)?;
        self.fields.insert(idx, field);
        Ok(())
    }

    fn add_option(&mut self, name: &str, option: SelectOption) -> Result<(), FormError> {
        let field = self.field_mut(name)?;
        match &mut field.kind {
            FieldKind::Select { options } => {
                options.push(option);
                Ok(())
            }
            _ => Err(FormError::NotASelect(name.to_string())),
        }
    }

    fn set_default(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.field_mut(name)?.default = Some(value.to_string());
        Ok(())
    }

    fn set_value(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.field_mut(name)?.value = Some(value.to_string());
        Ok(())
    }

    fn hide_if(&mut self, name: &str, dependency: Dependency) -> Result<(), FormError> {
        self.field_mut(name)?.hide_if.push(dependency);
        Ok(())
    }

    fn disable_if(&mut self, name: &str, dependency: Dependency) -> Result<(), FormError> {
        self.field_mut(name)?.disabled_if.push(dependency);
        Ok(())
    }

    fn freeze(&mut self, name: &str) -> Result<(), FormError> {
        self.field_mut(name)?.frozen = true;
        Ok(())
    }

    fn remove_field(&mut self, name: &str) -> Result<(), FormError> {
        let idx = self.position(name)?;
        self.fields.remove(idx);
        Ok(())
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    fn submitted(&self, name: &str) -> Option<&str> {
        self.submission.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_before_keeps_order() {
        let mut set = CompletionFieldSet::new();
        set.add_field(FormField::hidden("a", "0"));
        set.add_field(FormField::hidden("c", "0"));
        set.insert_before(FormField::notice("b", "B", "text"), "c").unwrap();
        assert_eq!(set.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn operations_on_missing_field_fail() {
        let mut set = CompletionFieldSet::new();
        assert_eq!(set.freeze("nope"), Err(FormError::UnknownField("nope".into())));
        assert!(set.remove_field("nope").is_err());
        assert!(set.insert_before(FormField::hidden("x", "1"), "nope").is_err());
    }

    #[test]
    fn add_option_requires_select() {
        let mut set = CompletionFieldSet::new();
        set.add_field(FormField::checkbox("box", "Box", ""));
        assert_eq!(
            set.add_option("box", SelectOption::new("1", "One")),
            Err(FormError::NotASelect("box".into()))
        );
    }

    #[test]
    fn effective_value_prefers_explicit_then_submitted_then_default() {
        let submission = SubmittedData::new().with("f", "submitted");
        let mut set = CompletionFieldSet::with_submission(submission);
        set.add_field(FormField::text("f", "F"));
        set.set_default("f", "default").unwrap();
        assert_eq!(set.effective_value("f"), Some("submitted"));
        set.set_value("f", "explicit").unwrap();
        assert_eq!(set.effective_value("f"), Some("explicit"));
    }
}
