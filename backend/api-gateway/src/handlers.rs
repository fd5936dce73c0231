//! Public HTTP surface of the gateway
//!
//! - `GET /news?page=N`
//! - `GET /news/filter?s=text&page=N`
//! - `GET /news/id?id=N`: post with its comment forest
//! - `POST /news/comment`: moderate, then store
//! - `GET /health`, `GET /metrics`

use actix_middleware::RequestId;
use actix_web::http::header::ContentType;
use actix_web::{http::StatusCode, web, HttpResponse};
use news_common::http_client::RawResponse;
use news_common::{dismantle_forest, json, Comment};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::Aggregator;
use crate::config::SERVICE_NAME;
use crate::error::{GatewayError, Result};
use crate::metrics::serve_metrics;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/news")
                .route("", web::get().to(list_news))
                .route("/filter", web::get().to(filter_news))
                .route("/id", web::get().to(detailed_news))
                .route("/comment", web::post().to(add_comment)),
        );
}

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

#[derive(Debug, Serialize)]
pub struct CommentCreated {
    #[serde(rename = "ID")]
    pub id: i64,
}

/// Page number from the query. Absent or empty means page 1; anything else
/// must be an integer `>= 1`.
pub fn page_param(raw: Option<&str>) -> Result<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| GatewayError::InvalidInput("Invalid page number".to_string())),
    }
}

fn post_id_param(raw: Option<&str>) -> Result<i64> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Err(GatewayError::InvalidInput("ID not found.".to_string())),
        Some(s) => s,
    };
    raw.parse()
        .map_err(|e| GatewayError::InvalidInput(format!("Invalid post ID: {}", e)))
}

/// Relay a downstream answer unchanged.
fn proxy(raw: RawResponse) -> HttpResponse {
    let status = StatusCode::from_u16(raw.status).unwrap_or(StatusCode::BAD_GATEWAY);
    HttpResponse::build(status)
        .content_type("application/json")
        .body(raw.body)
}

pub async fn list_news(
    aggregator: web::Data<Aggregator>,
    query: web::Query<PageQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let page = page_param(query.page.as_deref())?;
    let raw = aggregator.posts_page(page, request_id.as_str()).await?;

    debug!(request_id = %request_id, page, status = raw.status, "Proxied post list");
    Ok(proxy(raw))
}

pub async fn filter_news(
    aggregator: web::Data<Aggregator>,
    query: web::Query<FilterQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let page = page_param(query.page.as_deref())?;
    let raw = aggregator
        .filtered_page(&query.s, page, request_id.as_str())
        .await?;

    debug!(request_id = %request_id, search = %query.s, page, status = raw.status, "Proxied filtered list");
    Ok(proxy(raw))
}

pub async fn detailed_news(
    aggregator: web::Data<Aggregator>,
    query: web::Query<IdQuery>,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let post_id = post_id_param(query.id.as_deref())?;
    let mut detailed = aggregator.detailed_post(post_id, request_id.as_str()).await?;

    let body = json::to_vec(&detailed);
    dismantle_forest(std::mem::take(&mut detailed.comments));
    let body = body.map_err(|e| GatewayError::Internal(format!("Failed to encode post: {}", e)))?;

    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
}

pub async fn add_comment(
    aggregator: web::Data<Aggregator>,
    body: web::Bytes,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let comment: Comment = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidInput(format!("Invalid request payload: {}", e)))?;

    let id = aggregator.add_comment(comment, request_id.as_str()).await?;
    Ok(HttpResponse::Ok().json(CommentCreated { id }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
    }))
}
