use sqlx::PgPool;

use crate::completion::GradeItemMapping;

/// Load the grade items of one component, e.g. "mod_forum".
pub async fn load_mapping(pool: &PgPool, component: &str) -> Result<GradeItemMapping, sqlx::Error> {
    let rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT item_number, item_name FROM grade_items WHERE component = $1 ORDER BY item_number",
    )
    .bind(component)
    .fetch_all(pool)
    .await?;

    let mut mapping = GradeItemMapping::new();
    mapping.insert(component, rows.into_iter().collect());
    Ok(mapping)
}
