//! PostgreSQL post store

use async_trait::async_trait;
use news_common::Post;
use sqlx::{PgPool, Row};
use tracing::{debug, error, info};

use super::PostStore;
use crate::error::{AppError, Result};

type PostRow = (i64, String, String, i64, String);

fn into_post((id, title, content, pub_time, link): PostRow) -> Post {
    Post {
        id,
        title,
        content,
        pub_time,
        link,
    }
}

/// Escape LIKE wildcards so the filter is a plain substring match
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn to_i64(value: u64, what: &str) -> Result<i64> {
    i64::try_from(value).map_err(|_| AppError::InvalidInput(format!("{} out of range", what)))
}

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `posts` table and its indexes if missing. Idempotent.
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring posts schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                pub_time BIGINT NOT NULL DEFAULT 0,
                link TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create posts table: {}", e);
            AppError::from(e)
        })?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_pub_time ON posts (pub_time DESC)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn posts(&self, offset: u64, limit: u64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, pub_time, link
            FROM posts
            ORDER BY pub_time DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(to_i64(limit, "limit")?)
        .bind(to_i64(offset, "offset")?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_post).collect())
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, pub_time, link FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_post))
    }

    async fn add_posts(&self, posts: Vec<Post>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for post in &posts {
            sqlx::query(
                r#"
                INSERT INTO posts (title, content, pub_time, link)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (link) DO UPDATE
                SET title = EXCLUDED.title,
                    content = EXCLUDED.content,
                    pub_time = EXCLUDED.pub_time
                "#,
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.pub_time)
            .bind(&post.link)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(count = posts.len(), "Stored posts");
        Ok(())
    }

    async fn filter(&self, query: &str, offset: u64, limit: u64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, pub_time, link
            FROM posts
            WHERE title ILIKE $1
            ORDER BY pub_time DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(like_pattern(query))
        .bind(to_i64(limit, "limit")?)
        .bind(to_i64(offset, "offset")?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_post).collect())
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count").max(0) as u64)
    }

    async fn count_filtered(&self, query: &str) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE title ILIKE $1")
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count").max(0) as u64)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
