/// Configuration management for Comments Service
use db_pool::DbConfig;
use news_common::env::{env_string_or, parse_env_with_default};

pub const SERVICE_NAME: &str = "comments-service";

#[derive(Debug, Clone)]
pub struct Config {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed CORS origins
    pub allowed_origins: String,
    /// PostgreSQL settings; `None` selects the in-memory store
    pub database: Option<DbConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let env = env_string_or("APP_ENV", "development");
        let allowed_origins = env_string_or("CORS_ALLOWED_ORIGINS", "*");
        actix_middleware::validate_origins(&env, &allowed_origins)?;

        Ok(Config {
            env,
            host: env_string_or("COMMENTS_SERVICE_HOST", "0.0.0.0"),
            port: parse_env_with_default("COMMENTS_SERVICE_PORT", 8082),
            allowed_origins,
            database: DbConfig::from_env(SERVICE_NAME),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_port_override() {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("CORS_ALLOWED_ORIGINS");
        std::env::set_var("COMMENTS_SERVICE_PORT", "9102");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9102");

        std::env::remove_var("COMMENTS_SERVICE_PORT");
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back_to_default() {
        std::env::remove_var("APP_ENV");
        std::env::set_var("COMMENTS_SERVICE_PORT", "not-a-port");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8082);

        std::env::remove_var("COMMENTS_SERVICE_PORT");
    }
}
