//! Gonews API Gateway
//!
//! Single public entry point. Proxies paginated post lists to news-service,
//! assembles a post with its comment forest from two services in parallel,
//! and runs new comments through censor-service before comments-service
//! stores them.

pub mod aggregator;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;

pub use aggregator::Aggregator;
pub use config::Config;
pub use error::{GatewayError, Result};
