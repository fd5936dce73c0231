//! Prometheus metrics for the gateway.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Detail-view aggregations by outcome (success, not_found, failure).
    pub static ref AGGREGATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "gateway_aggregations_total",
        "Post detail aggregations segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register gateway_aggregations_total");

    /// Moderation gate results (accepted, rejected, error).
    pub static ref MODERATION_DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "gateway_moderation_decisions_total",
        "Moderation gate results segmented by decision",
        &["decision"]
    )
    .expect("failed to register gateway_moderation_decisions_total");

    /// Comment writes after acceptance (stored, failed).
    pub static ref COMMENT_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "gateway_comment_writes_total",
        "Comment store attempts segmented by result",
        &["result"]
    )
    .expect("failed to register gateway_comment_writes_total");
}

pub fn record_aggregation(outcome: &str) {
    AGGREGATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_moderation(decision: &str) {
    MODERATION_DECISIONS_TOTAL.with_label_values(&[decision]).inc();
}

pub fn record_comment_write(result: &str) {
    COMMENT_WRITES_TOTAL.with_label_values(&[result]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
