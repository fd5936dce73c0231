//! CORS policy shared by all Gonews services
//!
//! Browsers hit the gateway and services directly during development, so the
//! policy is driven by a comma-separated origin list; `*` allows any origin.

use actix_cors::Cors;

/// Build the CORS middleware from a comma-separated list of origins.
pub fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method()
        .allow_any_header()
        .expose_headers(vec!["x-request-id"])
        .max_age(3600)
}

/// Reject a wildcard origin list outside development.
pub fn validate_origins(app_env: &str, allowed_origins: &str) -> Result<(), String> {
    if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
        return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
    }
    Ok(())
}
