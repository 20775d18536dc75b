use sqlx::PgPool;

use crate::completion::CourseDisplaySettings;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub fullname: String,
    pub enable_completion: bool,
    pub show_completion_conditions: bool,
    pub show_activity_dates: bool,
}

impl Course {
    pub fn display_settings(&self) -> CourseDisplaySettings {
        CourseDisplaySettings {
            show_completion_conditions: self.show_completion_conditions,
            show_activity_dates: self.show_activity_dates,
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, fullname, enable_completion, show_completion_conditions, show_activity_dates \
         FROM courses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
