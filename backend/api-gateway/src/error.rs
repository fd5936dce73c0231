//! Client-facing error categories
//!
//! Every failure short-circuits the request and is reported once. Only
//! persistence failures after a comment was accepted are server errors;
//! everything else, including unreachable services, is a 400.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use news_common::ServiceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed id, page or body; no downstream call was made
    #[error("{0}")]
    InvalidInput(String),

    /// A downstream service was unreachable or answered with an error
    #[error("{0}")]
    Downstream(String),

    #[error("{0}")]
    NotFound(String),

    /// The comment text failed moderation
    #[error("Comment rejected: {0}")]
    ModerationRejected(String),

    /// The comment passed moderation but could not be stored
    #[error("Failed to save comment: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidInput(_) => "invalid_input",
            GatewayError::Downstream(_) => "downstream",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::ModerationRejected(_) => "moderation_rejected",
            GatewayError::Persistence(_) => "persistence",
            GatewayError::Internal(_) => "internal",
        }
    }

    /// Failure of the post lookup; a 404 from news-service stays distinguishable.
    pub fn from_post_fetch(err: ServiceError) -> Self {
        if err.is_not_found() {
            GatewayError::NotFound(format!("Post not found: {}", err))
        } else {
            GatewayError::Downstream(err.to_string())
        }
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        GatewayError::Downstream(err.to_string())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Persistence(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_fetch_not_found_is_distinct() {
        let err = GatewayError::from_post_fetch(ServiceError::Status {
            service: "news-service".into(),
            status: 404,
            body: "Post not found".into(),
        });
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = GatewayError::from_post_fetch(ServiceError::Transport {
            service: "news-service".into(),
            message: "connection refused".into(),
        });
        assert_eq!(err.kind(), "downstream");
    }

    #[test]
    fn test_only_persistence_and_internal_are_server_errors() {
        assert_eq!(
            GatewayError::Persistence("db down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        for err in [
            GatewayError::InvalidInput("x".into()),
            GatewayError::Downstream("x".into()),
            GatewayError::ModerationRejected("x".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
