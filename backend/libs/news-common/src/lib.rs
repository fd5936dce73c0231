//! Gonews Common Library
//!
//! Shared wire models and the inter-service HTTP client used by the
//! gateway and the content services.

pub mod env;
pub mod error;
pub mod http_client;
pub mod json;
pub mod models;
pub mod shutdown;
pub mod telemetry;

pub use error::{Result, ServiceError};
pub use http_client::ServiceClient;
pub use models::{dismantle_forest, Comment, DetailedPost, Pagination, Post, PostPage};
pub use shutdown::shutdown_signal;

/// Query parameter carrying the correlation identifier between services.
pub const REQUEST_ID_PARAM: &str = "request_id";
