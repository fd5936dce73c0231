use actix_middleware::{build_cors, Logging, RequestIdMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use news_common::{shutdown_signal, telemetry::init_tracing};
use tracing::info;

use censor_service::config::{Config, SERVICE_NAME};
use censor_service::{handlers, Censor};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(SERVICE_NAME).map_err(anyhow::Error::msg)?;

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.env);

    let censor = Censor::from_config(&config).context("Failed to load banned words")?;
    info!(count = censor.banned_words().len(), "Banned word list loaded");

    let censor = web::Data::new(censor);
    let allowed_origins = config.allowed_origins.clone();
    let bind_address = config.bind_address();

    info!("HTTP server listening on {}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(censor.clone())
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
