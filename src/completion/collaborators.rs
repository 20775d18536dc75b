//! Contracts for the things the completion core reads but does not own.
//!
//! All of them are synchronous: the handlers fetch from the database first
//! and hand the core an in-memory snapshot.

use std::collections::{BTreeMap, HashMap};

use super::form::{FormError, FormFieldSink};
use super::types::SubmittedData;

/// Grade items an activity module produces, keyed by item number.
pub trait GradeItemCatalog {
    fn item_name_mapping(&self, component: &str) -> BTreeMap<i64, String>;

    /// Name of the host form field holding `kind` for a grade item,
    /// e.g. "grade" for the unnamed item 0, "grade_rating" for a named one.
    fn field_name(&self, component: &str, item_number: i64, kind: &str) -> String {
        match self.item_name_mapping(component).get(&item_number) {
            Some(name) if !name.is_empty() => format!("{kind}_{name}"),
            _ => kind.to_string(),
        }
    }
}

/// Completion rules only a particular activity module knows about.
pub trait ModuleRuleProvider {
    /// Add the module's rule fields to `form` and return their names.
    fn add_custom_completion_fields(&self, form: &mut dyn FormFieldSink) -> Result<Vec<String>, FormError>;

    fn is_rule_satisfied(&self, data: &SubmittedData) -> bool;
}

pub trait CompletionCountSource {
    fn count_users_with_progress(&self, cm_id: i64) -> i64;
}

pub trait Localizer {
    fn get_string(&self, key: &str, component: &str, arg: Option<&str>) -> String;
}

/// Grade items prefetched per component.
#[derive(Debug, Clone, Default)]
pub struct GradeItemMapping {
    components: HashMap<String, BTreeMap<i64, String>>,
}

impl GradeItemMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, component: &str, items: &[(i64, &str)]) -> Self {
        self.insert(
            component,
            items.iter().map(|(n, name)| (*n, name.to_string())).collect(),
        );
        self
    }

    pub fn insert(&mut self, component: &str, items: BTreeMap<i64, String>) {
        self.components.insert(component.to_string(), items);
    }
}

impl GradeItemCatalog for GradeItemMapping {
    fn item_name_mapping(&self, component: &str) -> BTreeMap<i64, String> {
        self.components.get(component).cloned().unwrap_or_default()
    }
}

/// Completed-user count taken once, after the form fields were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub cm_id: i64,
    pub count: i64,
}

impl CompletionCountSource for ProgressSnapshot {
    fn count_users_with_progress(&self, cm_id: i64) -> i64 {
        if cm_id == self.cm_id { self.count } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_for_unnamed_and_named_items() {
        let catalog = GradeItemMapping::new()
            .with_items("mod_forum", &[(0, "rating"), (1, "forum")])
            .with_items("mod_assign", &[(0, "")]);
        assert_eq!(catalog.field_name("mod_forum", 0, "grade"), "grade_rating");
        assert_eq!(catalog.field_name("mod_forum", 1, "grade"), "grade_forum");
        assert_eq!(catalog.field_name("mod_assign", 0, "grade"), "grade");
        assert_eq!(catalog.field_name("mod_unknown", 0, "gradepass"), "gradepass");
    }

    #[test]
    fn snapshot_only_answers_for_its_module() {
        let snapshot = ProgressSnapshot { cm_id: 7, count: 3 };
        assert_eq!(snapshot.count_users_with_progress(7), 3);
        assert_eq!(snapshot.count_users_with_progress(8), 0);
    }
}
