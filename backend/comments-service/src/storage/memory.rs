//! In-memory comment store

use async_trait::async_trait;
use news_common::Comment;
use tokio::sync::RwLock;

use super::CommentStore;
use crate::error::{AppError, Result};

#[derive(Default)]
struct State {
    next_id: i64,
    comments: Vec<Comment>,
}

/// Process-local comment store; one lock over the whole list.
#[derive(Default)]
pub struct MemoryCommentStore {
    state: RwLock<State>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Comment {} not found", id))
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn add_comment(&self, mut comment: Comment) -> Result<i64> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        comment.id = state.next_id;
        comment.replies.clear();
        state.comments.push(comment);
        Ok(state.next_id)
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn update_comment(&self, id: i64, comment: Comment) -> Result<()> {
        let mut state = self.state.write().await;
        let stored = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;

        stored.post_id = comment.post_id;
        stored.parent_id = comment.parent_id;
        stored.content = comment.content;
        stored.add_time = comment.add_time;
        Ok(())
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let index = state
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;

        state.comments.remove(index);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
