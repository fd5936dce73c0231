//! Tracing subscriber setup shared by every service binary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::env::env_string_or;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info,actix_web=info`). Set
/// `LOG_FORMAT=json` for one JSON object per line.
pub fn init_tracing(service_name: &str) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info"));

    let json = env_string_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .try_init()
    };

    result.map_err(|e| format!("Failed to initialize tracing for {}: {}", service_name, e))?;

    tracing::info!(service = %service_name, json_logs = json, "Tracing initialized");
    Ok(())
}
