/// Post handlers - paginated lists and single-post lookup
use actix_middleware::RequestId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::paginate::{paginate, parse_page};
use crate::storage::PostStore;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub s: String,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// List posts, newest first
pub async fn list_posts(
    store: web::Data<Arc<dyn PostStore>>,
    query: web::Query<PageQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let page = parse_page(query.page.as_deref())?;

    let total = store.count().await?;
    let result = paginate(total, page, |offset, limit| store.posts(offset, limit)).await?;

    debug!(
        request_id = %request_id,
        page,
        total,
        returned = result.posts.len(),
        "Listed posts"
    );

    Ok(HttpResponse::Ok().json(result))
}

/// List posts whose title contains `s`
pub async fn filter_posts(
    store: web::Data<Arc<dyn PostStore>>,
    query: web::Query<FilterQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let page = parse_page(query.page.as_deref())?;
    let search = query.s.as_str();

    let total = store.count_filtered(search).await?;
    let result = paginate(total, page, |offset, limit| {
        store.filter(search, offset, limit)
    })
    .await?;

    debug!(
        request_id = %request_id,
        search,
        page,
        total,
        "Filtered posts"
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Fetch one post by id
pub async fn post_by_id(
    store: web::Data<Arc<dyn PostStore>>,
    query: web::Query<IdQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let raw = query.id.as_deref().unwrap_or_default();
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("Invalid post ID: {}", e)))?;

    match store.post_by_id(id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => {
            warn!(request_id = %request_id, post_id = id, "Post not found");
            Err(AppError::NotFound("Post not found".to_string()))
        }
    }
}
