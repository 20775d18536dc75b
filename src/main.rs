use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use lms_completion::{config::AppConfig, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let secret_key = config.session_key.clone();
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .route(
                "/courses/{course_id}/modules/{cm_id}/completion",
                web::get().to(handlers::completion_handlers::edit_form),
            )
            .route(
                "/courses/{course_id}/modules/{cm_id}/completion",
                web::post().to(handlers::completion_handlers::submit),
            )
            .route(
                "/courses/{course_id}/modules/{cm_id}/completion/info",
                web::get().to(handlers::completion_handlers::info),
            )
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
