use actix_web::{web, HttpResponse};
use mongodb::Database;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::db::{blog_repo, comment_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::parse_object_id;
use crate::middleware::UserId;
use crate::models::CommentEntry;

// ============================================
// Request/Response Structs
// ============================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "must be between 1 and 1000 characters"))]
    pub content: String,
}

/// Created comment as stored, with ids and timestamps flattened to strings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub blog_id: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentResponse {
    pub success: bool,
    pub message: String,
    pub comment: CommentResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    pub success: bool,
    pub message: String,
    pub comment_count: usize,
    pub comments: Vec<CommentEntry>,
}

// ============================================
// Handler Functions
// ============================================

/// Comment on a blog
/// POST /api/v1/blogs/{blog_id}/comments
pub async fn create_comment(
    user_id: UserId,
    db: web::Data<Database>,
    path: web::Path<String>,
    request: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!(
        "[CREATE COMMENT] Request received - User ID: {}, Blog ID: {}",
        user_id.0.to_hex(),
        blog_id_str
    );

    request.validate()?;

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;

    if blog_repo::find_by_id(&db, blog_id).await?.is_none() {
        warn!(
            "[CREATE COMMENT] Blog does not exist - Blog ID: {}",
            blog_id_str
        );
        return Err(AppError::BadRequest("Blog does not exist".to_string()));
    }

    if user_repo::find_by_id(&db, user_id.0).await?.is_none() {
        warn!(
            "[CREATE COMMENT] User does not exist - User ID: {}",
            user_id.0.to_hex()
        );
        return Err(AppError::BadRequest("User does not exist".to_string()));
    }

    let comment = comment_repo::create_comment(&db, blog_id, user_id.0, &request.content).await?;

    info!(
        "[CREATE COMMENT] Comment created successfully - Comment ID: {}",
        comment.id.to_hex()
    );
    Ok(HttpResponse::Created().json(CreateCommentResponse {
        success: true,
        message: "Comment created".to_string(),
        comment: CommentResponse {
            id: comment.id.to_hex(),
            content: comment.content,
            blog_id: comment.blog_id.to_hex(),
            user_id: comment.user_id.to_hex(),
            created_at: comment.created_at.try_to_rfc3339_string().unwrap_or_default(),
        },
    }))
}

/// List a blog's comments, newest first
/// GET /api/v1/blogs/{blog_id}/comments
pub async fn get_comments(
    db: web::Data<Database>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let blog_id_str = path.into_inner();
    info!("[GET COMMENTS] Request received - Blog ID: {}", blog_id_str);

    let blog_id = parse_object_id(&blog_id_str, "Invalid blog ID")?;

    if blog_repo::find_by_id(&db, blog_id).await?.is_none() {
        warn!(
            "[GET COMMENTS] Blog does not exist - Blog ID: {}",
            blog_id_str
        );
        return Err(AppError::BadRequest("Blog does not exist".to_string()));
    }

    let comments = comment_repo::list_for_blog(&db, blog_id).await?;

    info!(
        "[GET COMMENTS] Success - Blog ID: {}, Total Comments: {}",
        blog_id_str,
        comments.len()
    );
    Ok(HttpResponse::Ok().json(CommentListResponse {
        success: true,
        message: "Fetch comments".to_string(),
        comment_count: comments.len(),
        comments,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content_required() {
        let request = CreateCommentRequest {
            content: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_comment_content_bounded() {
        let request = CreateCommentRequest {
            content: "x".repeat(1001),
        };
        assert!(request.validate().is_err());
    }
}
