//! In-memory post store
//!
//! Used when PostgreSQL is not configured or unreachable. Honors the same
//! ordering, paging and upsert rules as the durable store.

use async_trait::async_trait;
use news_common::Post;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PostStore;
use crate::error::Result;

#[derive(Default)]
struct State {
    next_id: i64,
    posts: HashMap<i64, Post>,
    ids_by_link: HashMap<String, i64>,
}

impl State {
    /// Newest first; ties broken by id so paging is stable
    fn sorted<'a>(&'a self, filter: Option<&str>) -> Vec<&'a Post> {
        let needle = filter.map(str::to_lowercase);
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| match &needle {
                Some(n) => p.title.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();
        posts.sort_by(|a, b| b.pub_time.cmp(&a.pub_time).then(a.id.cmp(&b.id)));
        posts
    }
}

fn window(posts: Vec<&Post>, offset: u64, limit: u64) -> Vec<Post> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    posts.into_iter().skip(offset).take(limit).cloned().collect()
}

/// Process-local post store guarded by a single lock
#[derive(Default)]
pub struct MemoryPostStore {
    state: RwLock<State>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn posts(&self, offset: u64, limit: u64) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(window(state.sorted(None), offset, limit))
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).cloned())
    }

    async fn add_posts(&self, posts: Vec<Post>) -> Result<()> {
        let mut state = self.state.write().await;

        for mut post in posts {
            if let Some(&id) = state.ids_by_link.get(&post.link) {
                if let Some(existing) = state.posts.get_mut(&id) {
                    existing.title = post.title;
                    existing.content = post.content;
                    existing.pub_time = post.pub_time;
                }
                continue;
            }

            state.next_id += 1;
            post.id = state.next_id;
            state.ids_by_link.insert(post.link.clone(), post.id);
            state.posts.insert(post.id, post);
        }

        Ok(())
    }

    async fn filter(&self, query: &str, offset: u64, limit: u64) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(window(state.sorted(Some(query)), offset, limit))
    }

    async fn count(&self) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.posts.len() as u64)
    }

    async fn count_filtered(&self, query: &str) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.sorted(Some(query)).len() as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
