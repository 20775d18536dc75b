use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Field names used by the completion section of an activity settings form.
pub mod fields {
    pub const COMPLETION: &str = "completion";
    pub const VIEW: &str = "completionview";
    pub const USE_GRADE: &str = "completionusegrade";
    pub const PASS_GRADE: &str = "completionpassgrade";
    pub const GRADE_ITEM_NUMBER: &str = "completiongradeitemnumber";
    pub const EXPECTED: &str = "completionexpected";
    pub const UNLOCK_BUTTON: &str = "unlockcompletion";
    pub const UNLOCKED: &str = "completionunlocked";
    pub const UNLOCKED_NOTICE: &str = "completedunlocked";
    pub const WARNING_NOTICE: &str = "completedwarning";

    // Owned by the grading section of the host form, not by us.
    pub const GRADE_PASS: &str = "gradepass";
    pub const ASSESSED: &str = "assessed";
}

/// How completion of an activity is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTrackingMode {
    #[default]
    None,
    Manual,
    Automatic,
}

impl CompletionTrackingMode {
    pub fn as_i16(self) -> i16 {
        match self {
            CompletionTrackingMode::None => 0,
            CompletionTrackingMode::Manual => 1,
            CompletionTrackingMode::Automatic => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(CompletionTrackingMode::None),
            1 => Some(CompletionTrackingMode::Manual),
            2 => Some(CompletionTrackingMode::Automatic),
            _ => None,
        }
    }

    /// The value submitted by the mode select.
    pub fn form_value(self) -> String {
        self.as_i16().to_string()
    }

    pub fn from_form_value(value: &str) -> Option<Self> {
        value.trim().parse::<i16>().ok().and_then(Self::from_i16)
    }
}

/// What an activity module supports, read once per form render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityCompletionCapabilities {
    /// Module name, e.g. "forum". Grade items live under the `mod_{name}` component.
    pub module_name: String,
    pub supports_views: bool,
    pub supports_grades: bool,
    pub supports_rating: bool,
    pub has_module_specific_rules: bool,
    pub system_default_enabled: bool,
    pub module_default_enabled: bool,
}

impl ActivityCompletionCapabilities {
    pub fn default_completion_enabled(&self) -> bool {
        self.system_default_enabled && self.module_default_enabled
    }

    pub fn component(&self) -> String {
        format!("mod_{}", self.module_name)
    }

    /// Initial tracking mode offered on a fresh form.
    pub fn default_mode(&self) -> CompletionTrackingMode {
        if !self.default_completion_enabled() {
            CompletionTrackingMode::None
        } else if self.has_module_specific_rules || self.supports_views {
            CompletionTrackingMode::Automatic
        } else {
            CompletionTrackingMode::Manual
        }
    }
}

/// Raw submitted form values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedData(HashMap<String, String>);

impl SubmittedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Absent, empty and "0" all count as not set.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.get(name), Some(v) if !v.is_empty() && v != "0")
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn mode(&self) -> Option<CompletionTrackingMode> {
        self.get(fields::COMPLETION)
            .and_then(CompletionTrackingMode::from_form_value)
    }
}

impl From<HashMap<String, String>> for SubmittedData {
    fn from(map: HashMap<String, String>) -> Self {
        SubmittedData(map)
    }
}

/// Validation messages keyed by the field they belong to.
pub type FieldErrors = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> ActivityCompletionCapabilities {
        ActivityCompletionCapabilities {
            module_name: "page".into(),
            system_default_enabled: true,
            module_default_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn default_mode_none_when_either_default_is_off() {
        let mut c = caps();
        c.supports_views = true;
        c.system_default_enabled = false;
        assert_eq!(c.default_mode(), CompletionTrackingMode::None);
        c.system_default_enabled = true;
        c.module_default_enabled = false;
        assert_eq!(c.default_mode(), CompletionTrackingMode::None);
    }

    #[test]
    fn default_mode_automatic_with_views_or_rules() {
        let mut c = caps();
        c.supports_views = true;
        assert_eq!(c.default_mode(), CompletionTrackingMode::Automatic);
        let mut c = caps();
        c.has_module_specific_rules = true;
        assert_eq!(c.default_mode(), CompletionTrackingMode::Automatic);
    }

    #[test]
    fn default_mode_manual_with_grades_only() {
        let mut c = caps();
        c.supports_grades = true;
        assert_eq!(c.default_mode(), CompletionTrackingMode::Manual);
    }

    #[test]
    fn mode_form_value_parsing() {
        assert_eq!(CompletionTrackingMode::from_form_value("2"), Some(CompletionTrackingMode::Automatic));
        assert_eq!(CompletionTrackingMode::from_form_value(" 1 "), Some(CompletionTrackingMode::Manual));
        assert_eq!(CompletionTrackingMode::from_form_value("7"), None);
        assert_eq!(CompletionTrackingMode::from_form_value(""), None);
    }

    #[test]
    fn submitted_empty_semantics() {
        let data = SubmittedData::new().with("a", "1").with("b", "0").with("c", "");
        assert!(data.is_set("a"));
        assert!(!data.is_set("b"));
        assert!(!data.is_set("c"));
        assert!(!data.is_set("missing"));
    }
}
