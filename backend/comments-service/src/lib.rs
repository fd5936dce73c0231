/// Comments Service Library
///
/// Stores comments on news posts and returns them as nested reply threads.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for `/comments`
/// - `storage`: `CommentStore` trait with PostgreSQL and in-memory backends
/// - `tree`: flat list to reply forest
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod error;
pub mod handlers;
pub mod storage;
pub mod tree;

pub use config::Config;
pub use error::{AppError, Result};
pub use tree::build_comment_tree;
