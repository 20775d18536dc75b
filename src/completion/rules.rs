//! Module-specific completion rules for the activity modules we ship.

use super::collaborators::{Localizer, ModuleRuleProvider};
use super::form::{Dependency, FormError, FormField, FormFieldSink};
use super::types::SubmittedData;

/// For modules without rules of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModuleRules;

impl ModuleRuleProvider for NoModuleRules {
    fn add_custom_completion_fields(&self, _form: &mut dyn FormFieldSink) -> Result<Vec<String>, FormError> {
        Ok(vec![])
    }

    fn is_rule_satisfied(&self, _data: &SubmittedData) -> bool {
        false
    }
}

/// "Require at least N of something": an enable checkbox plus a count.
pub struct ThresholdRule<'a> {
    pub component: String,
    /// e.g. "completionposts"; the checkbox is `{field}enabled`.
    pub field: String,
    pub strings: &'a dyn Localizer,
}

impl ThresholdRule<'_> {
    pub fn enabled_field(&self) -> String {
        format!("{}enabled", self.field)
    }
}

impl ModuleRuleProvider for ThresholdRule<'_> {
    fn add_custom_completion_fields(&self, form: &mut dyn FormFieldSink) -> Result<Vec<String>, FormError> {
        let enabled = self.enabled_field();
        form.add_field(FormField::checkbox(
            &enabled,
            self.strings.get_string(&format!("{}group", self.field), &self.component, None),
            self.strings.get_string(&self.field, &self.component, None),
        ));
        form.add_field(FormField::text(&self.field, ""));
        form.set_default(&self.field, "1")?;
        form.disable_if(&self.field, Dependency::not_checked(&enabled))?;
        Ok(vec![enabled, self.field.clone()])
    }

    fn is_rule_satisfied(&self, data: &SubmittedData) -> bool {
        data.is_set(&self.enabled_field())
            && data
                .get(&self.field)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .is_some_and(|n| n != 0)
    }
}

/// A single checkbox rule, e.g. "make a submission".
pub struct FlagRule<'a> {
    pub component: String,
    pub field: String,
    pub strings: &'a dyn Localizer,
}

impl ModuleRuleProvider for FlagRule<'_> {
    fn add_custom_completion_fields(&self, form: &mut dyn FormFieldSink) -> Result<Vec<String>, FormError> {
        form.add_field(FormField::checkbox(
            &self.field,
            "",
            self.strings.get_string(&self.field, &self.component, None),
        ));
        Ok(vec![self.field.clone()])
    }

    fn is_rule_satisfied(&self, data: &SubmittedData) -> bool {
        data.is_set(&self.field)
    }
}

/// Rule provider for a module name.
pub fn provider_for<'a>(module_name: &str, strings: &'a dyn Localizer) -> Box<dyn ModuleRuleProvider + 'a> {
    let component = format!("mod_{module_name}");
    match module_name {
        "forum" => Box::new(ThresholdRule { component, field: "completionposts".into(), strings }),
        "assign" => Box::new(FlagRule { component, field: "completionsubmit".into(), strings }),
        _ => Box::new(NoModuleRules),
    }
}
