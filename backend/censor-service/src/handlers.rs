//! HTTP handlers for censor-service

use actix_middleware::RequestId;
use actix_web::{web, HttpResponse};
use news_common::Comment;
use tracing::info;

use crate::config::SERVICE_NAME;
use crate::error::{CensorError, Result};
use crate::moderation::Censor;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/censor", web::post().to(censor_comment));
}

/// POST /censor
///
/// 200 when the comment text is acceptable, 400 with the reason otherwise.
pub async fn censor_comment(
    censor: web::Data<Censor>,
    body: web::Bytes,
    request_id: RequestId,
) -> Result<HttpResponse> {
    let comment: Comment = serde_json::from_slice(&body)
        .map_err(|e| CensorError::InvalidInput(format!("Invalid request payload: {}", e)))?;

    let result = censor.check(&comment.content);
    info!(
        request_id = %request_id,
        post_id = comment.post_id,
        accepted = result.accepted,
        "Moderation decision"
    );

    if result.accepted {
        Ok(HttpResponse::Ok().json(result))
    } else {
        Ok(HttpResponse::BadRequest().json(result))
    }
}

pub async fn health(censor: web::Data<Censor>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "banned_words": censor.banned_words().len(),
    }))
}
