//! Route tree for the API
//!
//! Mixed-method paths keep their public reads as plain routes; the
//! authenticated methods sit in method-guarded resources registered
//! first, so an unmatched guard falls through to the public handler.

use actix_web::{guard, web, Scope};

use crate::handlers::{auth, authors, blogs, comments, health, likes};
use crate::middleware::JwtAuthMiddleware;

pub fn api(jwt_secret: &str) -> Scope {
    let auth_guard = JwtAuthMiddleware::new(jwt_secret);

    web::scope("/api/v1")
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        .service(
            web::scope("/blogs")
                .service(
                    web::resource("")
                        .guard(guard::Post())
                        .wrap(auth_guard.clone())
                        .route(web::post().to(blogs::create_blog)),
                )
                // member listings before the {blog_id} catch-all
                .service(
                    web::resource("/liked")
                        .wrap(auth_guard.clone())
                        .route(web::get().to(blogs::get_liked_blogs)),
                )
                .service(
                    web::resource("/mine")
                        .wrap(auth_guard.clone())
                        .route(web::get().to(blogs::get_your_blogs)),
                )
                .service(
                    web::resource("/{blog_id}/comments")
                        .guard(guard::Post())
                        .wrap(auth_guard.clone())
                        .route(web::post().to(comments::create_comment)),
                )
                .service(
                    web::resource("/{blog_id}/like")
                        .wrap(auth_guard)
                        .route(web::get().to(likes::get_like))
                        .route(web::post().to(likes::add_like))
                        .route(web::delete().to(likes::remove_like)),
                )
                .route("", web::get().to(blogs::get_all_blogs))
                .route("/{blog_id}", web::get().to(blogs::get_blog))
                .route("/{blog_id}/comments", web::get().to(comments::get_comments)),
        )
        .service(
            web::scope("/authors")
                .route("", web::get().to(authors::get_all_authors))
                .route("/{author_id}", web::get().to(authors::get_author)),
        )
}
