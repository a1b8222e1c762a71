use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrm_records::config::Config;
use hrm_records::db::init_store;
use hrm_records::docs::ApiDoc;
use hrm_records::routes::{self, Limiters};

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = config.log_level.parse::<Level>().unwrap_or(Level::DEBUG);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    if config.log_level.parse::<Level>().is_err() {
        warn!(log_level = %config.log_level, "Unknown LOG_LEVEL, using debug");
    }
    info!("Server starting...");

    let store = Data::new(init_store(&config.store_path)?);
    let limiters = Limiters::from_config(&config)?;

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(config_data.clone())
            .configure(|cfg| routes::configure(cfg, &api_prefix, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
