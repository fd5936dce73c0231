/// Configuration management for Censor Service
use news_common::env::{env_list, env_string_optional, env_string_or, parse_env_with_default};

pub const SERVICE_NAME: &str = "censor-service";

#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
    /// Banned tokens from `CENSOR_BANNED_WORDS`
    pub banned_words: Option<Vec<String>>,
    /// Path from `CENSOR_WORDS_FILE`; takes precedence over `banned_words`
    pub words_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let env = env_string_or("APP_ENV", "development");
        let allowed_origins = env_string_or("CORS_ALLOWED_ORIGINS", "*");
        actix_middleware::validate_origins(&env, &allowed_origins)?;

        Ok(Config {
            env,
            host: env_string_or("CENSOR_SERVICE_HOST", "0.0.0.0"),
            port: parse_env_with_default("CENSOR_SERVICE_PORT", 8083),
            allowed_origins,
            banned_words: env_list("CENSOR_BANNED_WORDS"),
            words_file: env_string_optional("CENSOR_WORDS_FILE"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
