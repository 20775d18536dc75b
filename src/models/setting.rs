use sqlx::PgPool;

/// Get a single setting's value by name, returning a default if not found.
pub async fn get_value(pool: &PgPool, name: &str, default: &str) -> String {
    sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| default.to_string())
}

pub async fn get_bool(pool: &PgPool, name: &str, default: bool) -> bool {
    let value = get_value(pool, name, if default { "true" } else { "false" }).await;
    matches!(value.as_str(), "true" | "1" | "yes")
}
