// Template context structures for Askama templates, organized by domain.

use actix_session::Session;
use sqlx::PgPool;

use crate::models::setting;

pub mod completion;

pub use completion::*;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub flash: Option<String>,
    pub current_path: String,
}

impl PageContext {
    pub async fn build(session: &Session, pool: &PgPool, current_path: &str) -> Self {
        let app_name = setting::get_value(pool, "app.name", "Course completion").await;
        Self {
            app_name,
            flash: take_flash(session),
            current_path: current_path.to_string(),
        }
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}
