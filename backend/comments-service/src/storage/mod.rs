//! Comment storage
//!
//! Stores hand back comments flat, in arrival order. Tree building happens
//! in the HTTP layer so both backends share it.

use async_trait::async_trait;
use news_common::Comment;

use crate::error::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCommentStore;
pub use postgres::PgCommentStore;

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment and return its assigned id. Any id in the
    /// payload is ignored.
    async fn add_comment(&self, comment: Comment) -> Result<i64>;

    /// All comments on a post, flat. Unknown posts yield an empty list.
    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// Replace the stored fields of comment `id`.
    /// Fails with `NotFound` when no such comment exists.
    async fn update_comment(&self, id: i64, comment: Comment) -> Result<()>;

    /// Fails with `NotFound` when no such comment exists.
    async fn delete_comment(&self, id: i64) -> Result<()>;

    fn backend(&self) -> &'static str;
}
