use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CensorError>;

#[derive(Debug, Error)]
pub enum CensorError {
    #[error("{0}")]
    InvalidInput(String),

    /// Word list could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CensorError {
    pub fn kind(&self) -> &'static str {
        match self {
            CensorError::InvalidInput(_) => "invalid_input",
            CensorError::Config(_) => "config",
        }
    }
}

impl ResponseError for CensorError {
    fn status_code(&self) -> StatusCode {
        match self {
            CensorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CensorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16(),
        }))
    }
}
