use actix_middleware::{build_cors, Logging, RequestIdMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use news_common::{shutdown_signal, telemetry::init_tracing};
use std::sync::Arc;
use tracing::{info, warn};

use comments_service::config::{Config, SERVICE_NAME};
use comments_service::handlers;
use comments_service::storage::{CommentStore, MemoryCommentStore, PgCommentStore};

async fn build_store(config: &Config) -> Arc<dyn CommentStore> {
    let Some(db_config) = &config.database else {
        warn!("DATABASE_URL not set; using in-memory comment store");
        return Arc::new(MemoryCommentStore::new());
    };

    db_config.log_config();

    let pool = match db_pool::create_pool(db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "PostgreSQL unavailable; using in-memory comment store");
            return Arc::new(MemoryCommentStore::new());
        }
    };

    let store = PgCommentStore::new(pool);
    if let Err(e) = store.ensure_schema().await {
        warn!(error = %e, "Schema setup failed; using in-memory comment store");
        return Arc::new(MemoryCommentStore::new());
    }
    Arc::new(store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(SERVICE_NAME).map_err(anyhow::Error::msg)?;

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.env);

    let store = build_store(&config).await;
    info!(backend = store.backend(), "Comment store ready");

    let store_data = web::Data::new(store);
    let allowed_origins = config.allowed_origins.clone();
    let bind_address = config.bind_address();

    info!("HTTP server listening on {}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(Logging)
            .wrap(RequestIdMiddleware)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .disable_signals()
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            handle.stop(true).await;
            server.await.context("HTTP server failed during shutdown")?;
        }
    }

    info!("{} stopped", SERVICE_NAME);
    Ok(())
}
