/// Configuration management for the API gateway
use news_common::env::{env_string_or, parse_env_with_default};
use std::time::Duration;

pub const SERVICE_NAME: &str = "api-gateway";

#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
    pub downstream: DownstreamConfig,
}

/// Base URLs of the services behind the gateway
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    pub news_url: String,
    pub comments_url: String,
    pub censor_url: String,
    /// Transport timeout applied to every downstream request
    pub timeout_secs: u64,
}

impl DownstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let env = env_string_or("APP_ENV", "development");
        let allowed_origins = env_string_or("CORS_ALLOWED_ORIGINS", "*");
        actix_middleware::validate_origins(&env, &allowed_origins)?;

        let timeout_secs = parse_env_with_default("DOWNSTREAM_TIMEOUT_SECS", 10u64);
        if timeout_secs == 0 {
            return Err("DOWNSTREAM_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Config {
            env,
            host: env_string_or("GATEWAY_HOST", "0.0.0.0"),
            port: parse_env_with_default("GATEWAY_PORT", 8080),
            allowed_origins,
            downstream: DownstreamConfig {
                news_url: env_string_or("NEWS_SERVICE_URL", "http://localhost:8081"),
                comments_url: env_string_or("COMMENTS_SERVICE_URL", "http://localhost:8082"),
                censor_url: env_string_or("CENSOR_SERVICE_URL", "http://localhost:8083"),
                timeout_secs,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
