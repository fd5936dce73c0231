//! PostgreSQL comment store

use async_trait::async_trait;
use news_common::Comment;
use sqlx::{PgPool, Row};
use tracing::{error, info};

use super::CommentStore;
use crate::error::{AppError, Result};

type CommentRow = (i64, i64, i64, String, i64);

fn into_comment((id, post_id, parent_id, content, add_time): CommentRow) -> Comment {
    Comment {
        id,
        post_id,
        parent_id,
        content,
        add_time,
        replies: Vec::new(),
    }
}

pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `comments` table if missing. Idempotent.
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Ensuring comments schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGSERIAL PRIMARY KEY,
                post_id BIGINT NOT NULL,
                parent_id BIGINT NOT NULL DEFAULT 0,
                content TEXT NOT NULL,
                add_time BIGINT NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create comments table: {}", e);
            AppError::from(e)
        })?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn add_comment(&self, comment: Comment) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO comments (post_id, parent_id, content, add_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .bind(comment.add_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("id"))
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, parent_id, content, add_time
            FROM comments
            WHERE post_id = $1
            ORDER BY id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(into_comment).collect())
    }

    async fn update_comment(&self, id: i64, comment: Comment) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET post_id = $1, parent_id = $2, content = $3, add_time = $4
            WHERE id = $5
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .bind(comment.add_time)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
