use sqlx::PgPool;

use crate::completion::{CompletionCondition, CompletionDetails, CompletionSettings, CompletionTrackingMode, ProgressSnapshot};

/// A user's stored completion row for one course module.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletionState {
    pub cm_id: i64,
    pub user_id: i64,
    pub completion_state: i16,
    pub viewed: bool,
}

impl CompletionState {
    pub fn is_complete(&self) -> bool {
        matches!(self.completion_state, 1 | 2)
    }
}

/// Number of users with any recorded progress on a course module.
pub async fn count_users_with_progress(pool: &PgPool, cm_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM course_modules_completion WHERE cm_id = $1")
        .bind(cm_id)
        .fetch_one(pool)
        .await
}

pub async fn progress_snapshot(pool: &PgPool, cm_id: i64) -> Result<ProgressSnapshot, sqlx::Error> {
    let count = count_users_with_progress(pool, cm_id).await?;
    Ok(ProgressSnapshot { cm_id, count })
}

pub async fn find_for_user(pool: &PgPool, cm_id: i64, user_id: i64) -> Result<Option<CompletionState>, sqlx::Error> {
    sqlx::query_as::<_, CompletionState>(
        "SELECT cm_id, user_id, completion_state, viewed \
         FROM course_modules_completion WHERE cm_id = $1 AND user_id = $2",
    )
    .bind(cm_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Erase every user's progress so completion is recalculated under new settings.
pub async fn reset_all_for_module(pool: &PgPool, cm_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_modules_completion WHERE cm_id = $1")
        .bind(cm_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Whether the user's completion is tracked in the course (enrolled and tracked).
pub async fn is_tracked_user(pool: &PgPool, course_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let tracked: Option<bool> = sqlx::query_scalar(
        "SELECT tracked FROM course_participants WHERE course_id = $1 AND user_id = $2",
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(tracked.unwrap_or(false))
}

/// Per-user completion details for the course page.
pub fn details_for(settings: &CompletionSettings, state: Option<&CompletionState>) -> CompletionDetails {
    if settings.mode == CompletionTrackingMode::None {
        return CompletionDetails::default();
    }
    let overall_complete = state.is_some_and(CompletionState::is_complete);
    let is_automatic = settings.mode == CompletionTrackingMode::Automatic;

    let mut conditions = Vec::new();
    if is_automatic {
        if settings.view {
            conditions.push(CompletionCondition {
                key: "completionview".to_string(),
                description: "View".to_string(),
                complete: state.is_some_and(|s| s.viewed),
            });
        }
        if settings.use_grade {
            conditions.push(CompletionCondition {
                key: "completionusegrade".to_string(),
                description: "Receive a grade".to_string(),
                complete: state.is_some_and(|s| matches!(s.completion_state, 1..=3)),
            });
        }
        if settings.pass_grade {
            conditions.push(CompletionCondition {
                key: "completionpassgrade".to_string(),
                description: "Receive a passing grade".to_string(),
                complete: state.is_some_and(|s| s.completion_state == 2),
            });
        }
        for name in settings.custom_rules.keys().filter(|k| !k.ends_with("enabled")) {
            conditions.push(CompletionCondition {
                key: name.clone(),
                description: name.trim_start_matches("completion").to_string(),
                complete: overall_complete,
            });
        }
    }

    CompletionDetails {
        has_completion: true,
        is_automatic,
        show_manual_completion: !is_automatic,
        overall_complete,
        conditions,
    }
}
