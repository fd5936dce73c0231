/// HTTP handlers for comments-service
pub mod comments;
pub mod health;

use actix_web::web;

pub use comments::{add_comment, delete_comment, list_comments, update_comment};
pub use health::health;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/comments")
            .route("", web::get().to(list_comments))
            .route("", web::post().to(add_comment))
            .route("/{id}", web::put().to(update_comment))
            .route("/{id}", web::delete().to(delete_comment)),
    );
}
