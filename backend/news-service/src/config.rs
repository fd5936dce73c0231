/// Configuration management for News Service
///
/// All settings come from environment variables (optionally seeded from a
/// `.env` file by the binary).
use db_pool::DbConfig;
use news_common::env::{env_string_optional, env_string_or, parse_env_with_default};
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "news-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// PostgreSQL settings; `None` selects the in-memory store
    pub database: Option<DbConfig>,
    /// JSON file of posts loaded into the store at startup
    pub seed_file: Option<String>,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = env_string_or("APP_ENV", "development");

        let allowed_origins = env_string_or("CORS_ALLOWED_ORIGINS", "*");
        actix_middleware::validate_origins(&app_env, &allowed_origins)?;

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: env_string_or("NEWS_SERVICE_HOST", "0.0.0.0"),
                port: parse_env_with_default("NEWS_SERVICE_PORT", 8081),
            },
            cors: CorsConfig { allowed_origins },
            database: DbConfig::from_env(SERVICE_NAME),
            seed_file: env_string_optional("NEWS_SEED_FILE"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
