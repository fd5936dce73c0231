//! Errors raised while talking to another Gonews service
//!
//! The gateway maps these onto its own client-facing categories; nothing here
//! is retried.

use thiserror::Error;

/// Result type alias for inter-service calls
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failure of a single downstream call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("{service} unreachable: {message}")]
    Transport { service: String, message: String },

    /// The service answered with a non-success status
    #[error("{service} responded {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected model
    #[error("{service} sent an invalid payload: {message}")]
    Decode { service: String, message: String },

    /// The client could not be constructed
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ServiceError {
    /// HTTP status reported by the downstream service, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
