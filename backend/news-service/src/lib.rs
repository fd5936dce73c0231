/// News Service Library
///
/// Stores RSS-sourced posts and serves them as paginated lists, filtered
/// lists and single posts.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for `/news`, `/news/filter`, `/news/id`
/// - `paginate`: page arithmetic shared by the list endpoints
/// - `storage`: `PostStore` trait with PostgreSQL and in-memory backends
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod error;
pub mod handlers;
pub mod paginate;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
