/// Comment handlers
use actix_middleware::RequestId;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use news_common::{dismantle_forest, json, Comment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::storage::CommentStore;
use crate::tree::build_comment_tree;

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub id_post: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedComment {
    #[serde(rename = "ID")]
    pub id: i64,
}

fn parse_id(raw: &str, what: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("Invalid {}: {}", what, e)))
}

fn parse_comment(body: &[u8]) -> Result<Comment> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request payload: {}", e)))
}

/// GET /comments?id_post=N
///
/// Returns the post's comments as a reply forest. A post without comments
/// (or an unknown post) yields `[]`.
pub async fn list_comments(
    store: web::Data<Arc<dyn CommentStore>>,
    query: web::Query<CommentsQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let post_id = parse_id(query.id_post.as_deref().unwrap_or_default(), "post ID")?;

    let flat = store.comments(post_id).await?;
    let fetched = flat.len();
    let forest = build_comment_tree(flat);

    debug!(
        request_id = %request_id,
        post_id,
        fetched,
        roots = forest.len(),
        "Built comment tree"
    );

    // Threads nest without limit: encode with a growable stack and release
    // the forest iteratively.
    let body = json::to_vec(&forest);
    dismantle_forest(forest);
    let body = body.map_err(|e| AppError::Internal(format!("Failed to encode comments: {}", e)))?;

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
}

/// POST /comments
pub async fn add_comment(
    store: web::Data<Arc<dyn CommentStore>>,
    body: web::Bytes,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let mut comment = parse_comment(&body)?;
    if comment.add_time == 0 {
        comment.add_time = Utc::now().timestamp();
    }

    let post_id = comment.post_id;
    let id = store.add_comment(comment).await?;

    info!(request_id = %request_id, post_id, comment_id = id, "Comment stored");

    Ok(HttpResponse::Ok().json(CreatedComment { id }))
}

/// PUT /comments/{id}
pub async fn update_comment(
    store: web::Data<Arc<dyn CommentStore>>,
    path: web::Path<String>,
    body: web::Bytes,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "comment ID")?;
    let comment = parse_comment(&body)?;

    store.update_comment(id, comment).await?;

    info!(request_id = %request_id, comment_id = id, "Comment updated");
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    store: web::Data<Arc<dyn CommentStore>>,
    path: web::Path<String>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let id = parse_id(&path, "comment ID")?;

    store.delete_comment(id).await?;

    info!(request_id = %request_id, comment_id = id, "Comment deleted");
    Ok(HttpResponse::NoContent().finish())
}
