/// HTTP handlers for news-service
///
/// - `GET /news?page=N`: newest posts, paginated
/// - `GET /news/filter?s=text&page=N`: posts whose title contains `text`
/// - `GET /news/id?id=N`: one post
/// - `GET /health`
pub mod health;
pub mod news;

use actix_web::web;

pub use health::health;
pub use news::{filter_posts, list_posts, post_by_id};

/// Register every news-service route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/news")
                .route("", web::get().to(list_posts))
                .route("/filter", web::get().to(filter_posts))
                .route("/id", web::get().to(post_by_id)),
        );
}
