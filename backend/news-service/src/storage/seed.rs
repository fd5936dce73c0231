//! Startup seeding from a JSON file
//!
//! The file holds a JSON array of posts in wire format. `ID` values are
//! ignored; the store assigns its own.

use news_common::Post;
use std::path::Path;
use tracing::info;

use super::PostStore;
use crate::error::{AppError, Result};

pub async fn read_seed_file(path: impl AsRef<Path>) -> Result<Vec<Post>> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Internal(format!("read {}: {}", path.display(), e)))?;

    Ok(serde_json::from_slice(&raw)?)
}

/// Load posts from `path` into `store`, returning how many were read.
pub async fn seed_store(store: &dyn PostStore, path: impl AsRef<Path>) -> Result<usize> {
    let posts = read_seed_file(path.as_ref()).await?;
    let count = posts.len();
    store.add_posts(posts).await?;

    info!(count, path = %path.as_ref().display(), "Seeded post store");
    Ok(count)
}
