use actix_middleware::{build_cors, Logging, RequestIdMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use news_common::{shutdown_signal, telemetry::init_tracing};
use std::sync::Arc;
use tracing::{error, info, warn};

use news_service::config::{Config, SERVICE_NAME};
use news_service::handlers;
use news_service::storage::{seed::seed_store, MemoryPostStore, PgPostStore, PostStore};

/// Pick the storage backend once. PostgreSQL when configured and reachable,
/// the in-memory store otherwise.
async fn build_store(config: &Config) -> Arc<dyn PostStore> {
    let Some(db_config) = &config.database else {
        warn!("DATABASE_URL not set; using in-memory post store");
        return Arc::new(MemoryPostStore::new());
    };

    db_config.log_config();

    match db_pool::create_pool(db_config).await {
        Ok(pool) => {
            let store = PgPostStore::new(pool);
            match store.ensure_schema().await {
                Ok(()) => Arc::new(store),
                Err(e) => {
                    warn!(error = %e, "Schema setup failed; using in-memory post store");
                    Arc::new(MemoryPostStore::new())
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "PostgreSQL unavailable; using in-memory post store");
            Arc::new(MemoryPostStore::new())
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(SERVICE_NAME).map_err(anyhow::Error::msg)?;

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);

    let store = build_store(&config).await;
    info!(backend = store.backend(), "Post store ready");

    if let Some(path) = &config.seed_file {
        if let Err(e) = seed_store(store.as_ref(), path).await {
            error!(error = %e, path = %path, "Failed to seed post store");
        }
    }

    let store_data = web::Data::new(store);
    let allowed_origins = config.cors.allowed_origins.clone();
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
