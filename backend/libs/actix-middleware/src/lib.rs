//! # Actix Middleware Library
//!
//! Shared middleware components for the Gonews Actix services
//!
//! ## Modules
//! - `request_id`: correlation identifier extraction, generation and propagation
//! - `logging`: per-request access log through `tracing`
//! - `cors`: CORS policy built from configuration

pub mod cors;
pub mod logging;
pub mod request_id;

pub use cors::{build_cors, validate_origins};
pub use logging::Logging;
pub use request_id::{RequestId, RequestIdMiddleware, REQUEST_ID_HEADER, REQUEST_ID_PARAM};
