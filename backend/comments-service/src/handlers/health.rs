use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::config::SERVICE_NAME;
use crate::storage::CommentStore;

pub async fn health(store: web::Data<Arc<dyn CommentStore>>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "storage": store.backend(),
    }))
}
