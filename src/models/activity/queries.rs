use sqlx::PgPool;

use crate::completion::{ActivityDate, CompletionSettings, Localizer};
use super::types::*;

/// Find a course module within a course, joined with its module features.
pub async fn find_by_id(pool: &PgPool, course_id: i64, cm_id: i64) -> Result<Option<Activity>, sqlx::Error> {
    sqlx::query_as::<_, Activity>(
        "SELECT cm.id, cm.course_id, cm.modname, cm.name, cm.assessed, \
                cm.completion, cm.completion_view, cm.completion_use_grade, \
                cm.completion_grade_item_number, cm.completion_pass_grade, \
                cm.completion_expected, cm.completion_custom, cm.time_open, cm.time_close, \
                mf.tracks_views, mf.has_grade, mf.has_rules, mf.default_completion, mf.rating \
         FROM course_modules cm \
         JOIN module_features mf ON mf.name = cm.modname \
         WHERE cm.id = $1 AND cm.course_id = $2",
    )
    .bind(cm_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

/// Persist completion settings for a course module.
pub async fn save_completion(pool: &PgPool, cm_id: i64, settings: &CompletionSettings) -> Result<(), sqlx::Error> {
    let custom = serde_json::to_string(&settings.custom_rules).unwrap_or_else(|_| "{}".to_string());
    sqlx::query(
        "UPDATE course_modules SET \
            completion = $2, completion_view = $3, completion_use_grade = $4, \
            completion_grade_item_number = $5, completion_pass_grade = $6, \
            completion_expected = $7, completion_custom = $8 \
         WHERE id = $1",
    )
    .bind(cm_id)
    .bind(settings.mode.as_i16())
    .bind(settings.view)
    .bind(settings.use_grade)
    .bind(settings.grade_item_number)
    .bind(settings.pass_grade)
    .bind(settings.expected)
    .bind(custom)
    .execute(pool)
    .await?;
    Ok(())
}

/// Open/close dates of an activity, in display order.
pub fn activity_dates(activity: &Activity, strings: &dyn Localizer) -> Vec<ActivityDate> {
    let mut dates = Vec::new();
    if let Some(ts) = activity.time_open {
        dates.push(ActivityDate {
            data_id: "timeopen".to_string(),
            label: strings.get_string("activitydate:opens", "completion", None),
            timestamp: ts,
        });
    }
    if let Some(ts) = activity.time_close {
        dates.push(ActivityDate {
            data_id: "timeclose".to_string(),
            label: strings.get_string("activitydate:closes", "completion", None),
            timestamp: ts,
        });
    }
    dates
}
