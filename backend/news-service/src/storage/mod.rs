//! Post storage
//!
//! `PostStore` is the narrow contract the HTTP layer talks to. Two backends
//! implement it: [`postgres::PgPostStore`] for durable storage and
//! [`memory::MemoryPostStore`] used when no database is configured. The
//! backend is chosen once at startup and never mixed.

use async_trait::async_trait;
use news_common::Post;

use crate::error::Result;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryPostStore;
pub use postgres::PgPostStore;

/// Storage contract for news posts.
///
/// Lists are ordered by publication time, newest first. Filtering is a
/// case-insensitive substring match on the title.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// One window of posts
    async fn posts(&self, offset: u64, limit: u64) -> Result<Vec<Post>>;

    /// A single post; `None` when the id is unknown
    async fn post_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Insert posts, updating title, content and publication time of posts
    /// whose link is already stored. Ids are assigned by the store.
    async fn add_posts(&self, posts: Vec<Post>) -> Result<()>;

    /// One window of posts whose title contains `query`
    async fn filter(&self, query: &str, offset: u64, limit: u64) -> Result<Vec<Post>>;

    /// Number of stored posts
    async fn count(&self) -> Result<u64>;

    /// Number of posts whose title contains `query`
    async fn count_filtered(&self, query: &str) -> Result<u64>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}
