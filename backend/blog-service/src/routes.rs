/// Route table for the `/api` surface and the uploads mount
use actix_files::Files;
use actix_web::web;

use crate::error::{json_error_handler, path_error_handler};
use crate::handlers::{auth, comments, health, likes, posts};
use crate::media::MediaStorage;

/// Register extractor configs and every `/api` route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_summary))
                .route("/health/live", web::get().to(health::liveness_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/profile", web::get().to(auth::profile)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/likes", web::get().to(posts::list_likers)),
                )
                .service(
                    web::scope("/comments")
                        .route("", web::post().to(comments::create_comment))
                        .route(
                            "/post/{post_id}",
                            web::get().to(comments::list_post_comments),
                        )
                        .route("/{id}", web::delete().to(comments::delete_comment)),
                )
                .service(
                    web::scope("/likes")
                        .route("/{post_id}", web::post().to(likes::like_post))
                        .route("/{post_id}", web::delete().to(likes::unlike_post)),
                ),
        );
}

/// Static file service for stored uploads
pub fn uploads(media: &MediaStorage) -> Files {
    Files::new(media.public_prefix(), media.upload_dir())
}
