//! Shared fixtures for the completion integration tests.

#![allow(dead_code)]

use lms_completion::completion::{
    ActivityCompletionCapabilities, CompletionFieldLayout, CompletionFieldSet, CompletionRuleConfigurator,
    EnglishStrings, GradeItemMapping, ModuleRuleProvider, SubmittedData, fields, rules,
};

/// Capabilities with both completion defaults switched on.
pub fn caps(module: &str, views: bool, grades: bool, rules: bool) -> ActivityCompletionCapabilities {
    ActivityCompletionCapabilities {
        module_name: module.to_string(),
        supports_views: views,
        supports_grades: grades,
        supports_rating: false,
        has_module_specific_rules: rules,
        system_default_enabled: true,
        module_default_enabled: true,
    }
}

/// A catalog with `count` grade items for `mod_{module}`.
pub fn catalog_with_items(module: &str, count: usize) -> GradeItemMapping {
    let items: Vec<(i64, String)> = (0..count).map(|n| (n as i64, format!("item{n}"))).collect();
    let borrowed: Vec<(i64, &str)> = items.iter().map(|(n, s)| (*n, s.as_str())).collect();
    GradeItemMapping::new().with_items(&format!("mod_{module}"), &borrowed)
}

/// Build the completion section for a module on a fresh form.
pub fn build(
    caps: &ActivityCompletionCapabilities,
    catalog: &GradeItemMapping,
    submission: SubmittedData,
) -> (CompletionFieldSet, CompletionFieldLayout) {
    let strings = EnglishStrings;
    let module_rules = rules::provider_for(&caps.module_name, &strings);
    let configurator = CompletionRuleConfigurator::new(catalog, module_rules.as_ref(), &strings);
    let mut form = CompletionFieldSet::with_submission(submission);
    let layout = configurator.build_field_set(&mut form, caps).expect("completion fields");
    (form, layout)
}

/// Option values of the mode select.
pub fn mode_options(form: &CompletionFieldSet) -> Vec<String> {
    form.field(fields::COMPLETION)
        .expect("mode field")
        .options()
        .iter()
        .map(|o| o.value.clone())
        .collect()
}

/// Module rule stub with a fixed answer.
pub struct FixedRule(pub bool);

impl ModuleRuleProvider for FixedRule {
    fn add_custom_completion_fields(
        &self,
        _form: &mut dyn lms_completion::completion::FormFieldSink,
    ) -> Result<Vec<String>, lms_completion::completion::FormError> {
        Ok(vec![])
    }

    fn is_rule_satisfied(&self, _data: &SubmittedData) -> bool {
        self.0
    }
}

/// Insert a course and return its id.
pub async fn insert_course(pool: &sqlx::PgPool, show_conditions: bool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO courses (fullname, enable_completion, show_completion_conditions, show_activity_dates) \
         VALUES ('Course 101', TRUE, $1, TRUE) RETURNING id",
    )
    .bind(show_conditions)
    .fetch_one(pool)
    .await
}

/// Insert a course module of a seeded module type and return its id.
pub async fn insert_module(pool: &sqlx::PgPool, course_id: i64, modname: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("INSERT INTO course_modules (course_id, modname, name) VALUES ($1, $2, $3) RETURNING id")
        .bind(course_id)
        .bind(modname)
        .bind(format!("Test {modname}"))
        .fetch_one(pool)
        .await
}

/// Record completion progress for a user.
pub async fn insert_progress(
    pool: &sqlx::PgPool,
    cm_id: i64,
    user_id: i64,
    state: i16,
    viewed: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_modules_completion (cm_id, user_id, completion_state, viewed) VALUES ($1, $2, $3, $4)",
    )
    .bind(cm_id)
    .bind(user_id)
    .bind(state)
    .bind(viewed)
    .execute(pool)
    .await?;
    Ok(())
}
