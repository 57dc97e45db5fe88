use actix_web::{web, HttpResponse};
use mongodb::Database;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::handlers::parse_object_id;
use crate::models::{AuthorListItem, AuthorProfile};

// ============================================
// Response Structs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorListResponse {
    pub success: bool,
    pub message: String,
    pub author_count: usize,
    pub authors: Vec<AuthorListItem>,
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub success: bool,
    pub message: String,
    pub author: AuthorProfile,
}

// ============================================
// Handler Functions
// ============================================

/// List every user who has written at least one blog
/// GET /api/v1/authors
pub async fn get_all_authors(db: web::Data<Database>) -> Result<HttpResponse> {
    info!("[GET ALL AUTHORS] Request received");

    let authors = user_repo::authors_with_blogs(&db).await?;

    info!(
        "[GET ALL AUTHORS] Success - Total Authors: {}",
        authors.len()
    );
    Ok(HttpResponse::Ok().json(AuthorListResponse {
        success: true,
        message: "All authors fetched successfully".to_string(),
        author_count: authors.len(),
        authors,
    }))
}

/// Fetch one author's profile with their blogs
/// GET /api/v1/authors/{author_id}
pub async fn get_author(db: web::Data<Database>, path: web::Path<String>) -> Result<HttpResponse> {
    let author_id_str = path.into_inner();
    info!("[GET AUTHOR] Request received - Author ID: {}", author_id_str);

    let author_id = parse_object_id(&author_id_str, "Invalid author ID")?;

    let author = match user_repo::author_profile(&db, author_id).await? {
        Some(author) => author,
        None => {
            warn!(
                "[GET AUTHOR] Author does not exist - Author ID: {}",
                author_id_str
            );
            return Err(AppError::BadRequest("Author does not exist".to_string()));
        }
    };

    info!(
        "[GET AUTHOR] Author fetched successfully - Author ID: {}, Blog Count: {}",
        author_id_str, author.blog_count
    );
    Ok(HttpResponse::Ok().json(AuthorResponse {
        success: true,
        message: "Author fetched successfully".to_string(),
        author,
    }))
}
