use actix_middleware::{build_cors, Logging, RequestIdMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use news_common::{shutdown_signal, telemetry::init_tracing, ServiceClient};
use std::sync::Arc;
use tracing::info;

use api_gateway::clients::{HttpCommentsBackend, HttpModerationGate, HttpNewsBackend};
use api_gateway::config::{Config, SERVICE_NAME};
use api_gateway::{handlers, Aggregator};

fn build_aggregator(config: &Config) -> anyhow::Result<Aggregator> {
    let downstream = &config.downstream;
    let timeout = downstream.timeout();

    let news = ServiceClient::new("news-service", &downstream.news_url, timeout)?;
    let comments = ServiceClient::new("comments-service", &downstream.comments_url, timeout)?;
    let censor = ServiceClient::new("censor-service", &downstream.censor_url, timeout)?;

    info!(
        news = %downstream.news_url,
        comments = %downstream.comments_url,
        censor = %downstream.censor_url,
        timeout_secs = downstream.timeout_secs,
        "Downstream services configured"
    );

    Ok(Aggregator::new(
        Arc::new(HttpNewsBackend::new(news)),
        Arc::new(HttpCommentsBackend::new(comments)),
        Arc::new(HttpModerationGate::new(censor)),
    ))
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

    let aggregator = web::Data::new(build_aggregator(&config)?);
    let allowed_origins = config.allowed_origins.clone();
    let bind_address = config.bind_address();

    info!("HTTP server listening on {}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(aggregator.clone())
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
